//! Signing and verification key material from configuration.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use lobby_core::config::AuthConfig;
use lobby_core::error::{AppError, ErrorKind};

pub(crate) fn algorithm(config: &AuthConfig) -> Result<Algorithm, AppError> {
    match config.algorithm.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "RS256" => Ok(Algorithm::RS256),
        other => Err(AppError::configuration(format!(
            "Unsupported JWT algorithm '{other}'. Supported: HS256, RS256"
        ))),
    }
}

pub(crate) fn decoding_key(config: &AuthConfig) -> Result<DecodingKey, AppError> {
    match algorithm(config)? {
        Algorithm::RS256 => {
            let pem = decode_pem(config.public_key_base64.as_deref(), "public_key_base64")?;
            DecodingKey::from_rsa_pem(&pem).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid RSA public key", e)
            })
        }
        _ => Ok(DecodingKey::from_secret(config.jwt_secret.as_bytes())),
    }
}

pub(crate) fn encoding_key(config: &AuthConfig) -> Result<EncodingKey, AppError> {
    match algorithm(config)? {
        Algorithm::RS256 => {
            let pem = decode_pem(config.private_key_base64.as_deref(), "private_key_base64")?;
            EncodingKey::from_rsa_pem(&pem).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid RSA private key", e)
            })
        }
        _ => Ok(EncodingKey::from_secret(config.jwt_secret.as_bytes())),
    }
}

fn decode_pem(encoded: Option<&str>, field: &str) -> Result<Vec<u8>, AppError> {
    let encoded = encoded
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::configuration(format!("auth.{field} is required for RS256")))?;
    STANDARD.decode(encoded).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("auth.{field} is not valid base64"),
            e,
        )
    })
}
