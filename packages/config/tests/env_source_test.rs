//! Signing and verifying through bindings-provided configuration

use std::collections::HashMap;
use tollgate_config::{EnvSource, common_config};
use tollgate_jwt::{
    Claims, JWT_AUD, JWT_ISS, JWT_SECRET_NAME, JwtEngine, JwtError, MapSource, generate_secret,
};

fn bindings() -> HashMap<String, String> {
    HashMap::from([
        (JWT_ISS.to_string(), "https://auth.example".to_string()),
        (JWT_AUD.to_string(), "orders".to_string()),
        (JWT_SECRET_NAME.to_string(), "ORDERS_SIGNING_KEY".to_string()),
        ("ORDERS_SIGNING_KEY".to_string(), generate_secret(64)),
    ])
}

#[tokio::test]
async fn test_bindings_drive_the_engine() {
    let source = EnvSource::with_bindings(bindings());
    let config = common_config(&source).unwrap();
    let engine = JwtEngine::with_source(source);

    let token = engine
        .sign(Claims::builder().subject("u1").build(), &config)
        .await
        .unwrap();
    let payload = engine.verify(token.as_str(), &config).await.unwrap().unwrap();

    assert_eq!(payload.iss(), Some("https://auth.example"));
    assert_eq!(payload.aud(), Some("orders"));
    assert_eq!(payload.exp().unwrap() - payload.iat().unwrap(), 900);
}

#[tokio::test]
async fn test_missing_issuer_fails_signing() {
    let mut bindings = bindings();
    bindings.remove(JWT_ISS);
    let source = bindings
        .into_iter()
        .fold(MapSource::new(), |source, (name, value)| source.with(name, value));
    let config = common_config(&source).unwrap();
    assert_eq!(config.iss, "");

    let engine = JwtEngine::with_source(source);
    assert!(matches!(
        engine.sign(Claims::new(), &config).await,
        Err(JwtError::Configuration(_))
    ));
}
