//! Crypto provider implementations shipped with the engine.

mod hmac_sha512;

pub use hmac_sha512::RustCryptoProvider;
