//! CLI command definitions

use crate::error::CliError;
use clap::{Parser, Subcommand};
use serde_json::json;
use tollgate_config::{EnvSource, common_config};
use tollgate_jwt::{
    Claims, DEFAULT_SECRET_BYTES, JwtEngine, SignOptions, generate_secret, inspect,
};

#[derive(Debug, Parser)]
#[command(name = "tollgate")]
#[command(about = "Mint, verify and inspect signed authorization tokens")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Generate a base64url HS512 secret
    ///
    /// Example usage:
    ///   tollgate secret
    ///   tollgate secret --dotenv >> .env
    Secret {
        /// Length in bytes
        #[arg(long = "len", default_value_t = DEFAULT_SECRET_BYTES)]
        len: usize,

        /// Print a JSON document with metadata
        #[arg(long, conflicts_with = "dotenv")]
        json: bool,

        /// Print a JWT_SECRET=... line
        #[arg(long)]
        dotenv: bool,
    },

    /// Sign claims using JWT_* configuration from the environment
    Sign {
        /// Claims as a JSON object
        #[arg(long, default_value = "{}")]
        claims: String,

        /// Lifetime in seconds (overrides JWT_TTL_SECONDS)
        #[arg(long)]
        ttl: Option<u64>,

        /// Add a random jti
        #[arg(long)]
        jti: bool,
    },

    /// Verify a token and print its payload
    Verify {
        /// Token to verify
        token: String,
    },

    /// Decode a token without verifying it
    Inspect {
        /// Token to decode
        token: String,
    },
}

fn secret_output(len: usize, as_json: bool, dotenv: bool) -> Result<String, CliError> {
    if len == 0 {
        return Err(CliError::Usage("--len must be at least 1".to_string()));
    }
    let secret = generate_secret(len);
    if as_json {
        let doc = json!({
            "secret": secret,
            "lengthBytes": len,
            "format": "base64url",
            "createdAt": chrono::Utc::now().to_rfc3339(),
        });
        Ok(serde_json::to_string_pretty(&doc)?)
    } else if dotenv {
        Ok(format!("JWT_SECRET={secret}"))
    } else {
        Ok(secret)
    }
}

/// Execute a command and return what should be printed.
pub async fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Commands::Secret { len, json, dotenv } => secret_output(len, json, dotenv),
        Commands::Sign { claims, ttl, jti } => {
            let claims: serde_json::Value =
                serde_json::from_str(&claims).map_err(CliError::Claims)?;
            let claims = Claims::try_from(claims)?;
            let source = EnvSource::new();
            let config = common_config(&source)?;
            let mut options = SignOptions::default();
            if let Some(ttl) = ttl {
                options = options.ttl(ttl);
            }
            if jti {
                options = options.generate_jti();
            }
            let token = JwtEngine::with_source(source)
                .sign_with(claims, &config, &options)
                .await?;
            Ok(token.into())
        }
        Commands::Verify { token } => {
            let source = EnvSource::new();
            let config = common_config(&source)?;
            let payload = JwtEngine::with_source(source)
                .verify(&token, &config)
                .await?
                .ok_or(CliError::NotVerified)?;
            Ok(serde_json::to_string_pretty(&payload)?)
        }
        Commands::Inspect { token } => {
            let (header, payload) = inspect(&token)?;
            let doc = json!({
                "header": { "alg": header.alg().as_str(), "typ": header.typ() },
                "payload": payload,
            });
            Ok(serde_json::to_string_pretty(&doc)?)
        }
    }
}
