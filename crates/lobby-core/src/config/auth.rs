//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Bearer token verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Signing algorithm: `"HS256"` (shared secret) or `"RS256"` (PEM key pair).
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Secret key for HS256.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Base64-encoded PEM public key for RS256 verification.
    #[serde(default)]
    pub public_key_base64: Option<String>,
    /// Base64-encoded PEM private key for RS256 signing.
    #[serde(default)]
    pub private_key_base64: Option<String>,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Allowed clock skew in seconds when checking `exp`/`nbf`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            jwt_secret: default_jwt_secret(),
            public_key_base64: None,
            private_key_base64: None,
            access_token_ttl_minutes: default_access_ttl(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_leeway() -> u64 {
    5
}
