//! JWT access token validation.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use lobby_core::config::AuthConfig;
use lobby_core::error::AppError;
use lobby_core::result::AppResult;
use lobby_core::traits::TokenValidator;

use super::claims::Claims;
use super::keys;

/// Verifies bearer tokens and yields the identity they were issued to.
#[derive(Clone)]
pub struct JwtDecoder {
    /// Key used to check signatures (HMAC secret or RSA public key).
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(keys::algorithm(config)?);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            decoding_key: keys::decoding_key(config)?,
            validation,
        })
    }

    /// Decodes and validates a token string, returning its claims.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        AppError::authentication("Token is not yet valid")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenValidator for JwtDecoder {
    async fn validate(&self, token: &str) -> AppResult<Uuid> {
        self.decode_token(token).map(|claims| claims.sub)
    }
}
