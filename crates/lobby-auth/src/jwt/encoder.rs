//! JWT access token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use lobby_core::config::AuthConfig;
use lobby_core::error::AppError;

use super::claims::Claims;
use super::keys;

/// Creates signed access tokens.
///
/// The server itself only verifies tokens; issuance belongs to the account
/// service. The encoder is kept for operational tooling and tests.
#[derive(Clone)]
pub struct JwtEncoder {
    /// Key used for signing (HMAC secret or RSA private key).
    encoding_key: EncodingKey,
    /// Header naming the signing algorithm.
    header: Header,
    /// Default token lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: keys::encoding_key(config)?,
            header: Header::new(keys::algorithm(config)?),
            ttl: Duration::minutes(config.access_token_ttl_minutes as i64),
        })
    }

    /// Issues a token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> Result<(String, DateTime<Utc>), AppError> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Issues a token for `user_id` expiring `ttl` from now.
    pub fn issue_with_ttl(
        &self,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, expires_at))
    }
}
