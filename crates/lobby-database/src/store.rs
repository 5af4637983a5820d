//! Identity store contract.

use async_trait::async_trait;
use uuid::Uuid;

use lobby_core::result::AppResult;
use lobby_entity::User;

/// Authoritative source of identity records.
///
/// Consulted only when the session cache misses. `Ok(None)` means the
/// identity does not exist; `Err` means the store itself failed.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up the record for `id`.
    async fn find_identity(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
