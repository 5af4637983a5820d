//! Bearer credential validation contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Validates a bearer credential and yields the identity it was issued for.
///
/// Implementations verify signature and validity window only; they never
/// consult the identity store.
#[async_trait]
pub trait TokenValidator: Send + Sync + std::fmt::Debug + 'static {
    /// Validate `token`, returning the subject identity on success and an
    /// `Authentication` error otherwise.
    async fn validate(&self, token: &str) -> AppResult<Uuid>;
}
