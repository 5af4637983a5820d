//! Reasons a credential could not be turned into an identity.

use thiserror::Error;

use lobby_core::error::AppError;

/// Why authentication failed. The `Display` text is the client-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No credential was presented.
    #[error("Missing token")]
    MissingCredential,
    /// The validator rejected the credential.
    #[error("{0}")]
    InvalidCredential(String),
    /// The credential named an identity the store does not know.
    #[error("User not found")]
    IdentityNotFound,
    /// The identity store could not be queried.
    #[error("Token Error")]
    LookupFailed,
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::authentication(failure.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons() {
        assert_eq!(AuthFailure::MissingCredential.to_string(), "Missing token");
        assert_eq!(AuthFailure::IdentityNotFound.to_string(), "User not found");
        assert_eq!(
            AuthFailure::InvalidCredential("Token has expired".into()).to_string(),
            "Token has expired"
        );
    }

    #[test]
    fn test_into_app_error() {
        assert!(AppError::from(AuthFailure::IdentityNotFound).is_authentication());
        let err = AppError::from(AuthFailure::LookupFailed);
        assert!(err.is_authentication());
        assert_eq!(err.message, "Token Error");
    }
}
