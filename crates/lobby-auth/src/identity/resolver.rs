//! Resolve a bearer credential to an identity record.

use std::sync::Arc;

use tracing::{debug, error, warn};

use lobby_cache::SessionCache;
use lobby_core::traits::TokenValidator;
use lobby_database::IdentityStore;
use lobby_entity::User;

use super::failure::AuthFailure;

/// Token validator → session cache → identity store, populating the cache
/// on a store hit. One instance is shared by the WebSocket hub and the HTTP
/// authenticator so both paths benefit from the same cache.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    validator: Arc<dyn TokenValidator>,
    cache: Arc<SessionCache>,
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    /// Creates a new resolver.
    pub fn new(
        validator: Arc<dyn TokenValidator>,
        cache: Arc<SessionCache>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            validator,
            cache,
            store,
        }
    }

    /// The session cache this resolver reads and populates.
    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    /// Authenticate `credential`. A blank credential counts as missing.
    pub async fn resolve(&self, credential: Option<&str>) -> Result<User, AuthFailure> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::MissingCredential)?;

        let user_id = self.validator.validate(token).await.map_err(|e| {
            debug!(error = %e, "Bearer token rejected");
            AuthFailure::InvalidCredential(e.message)
        })?;

        if let Some(user) = self.cache.get(&user_id).await {
            return Ok(user);
        }

        match self.store.find_identity(user_id).await {
            Ok(Some(user)) => {
                self.cache.put(user_id, user.clone()).await;
                Ok(user)
            }
            Ok(None) => {
                warn!(user_id = %user_id, "Token subject not found in identity store");
                Err(AuthFailure::IdentityNotFound)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Identity store lookup failed");
                Err(AuthFailure::LookupFailed)
            }
        }
    }
}
