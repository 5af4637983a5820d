//! PostgreSQL-backed user lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lobby_core::error::{AppError, ErrorKind};
use lobby_core::result::AppResult;
use lobby_entity::User;

use crate::store::IdentityStore;

const USER_COLUMNS: &str =
    "id, created_at, updated_at, first_name, last_name, email, username";

/// Repository for user queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }
}

#[async_trait]
impl IdentityStore for UserRepository {
    async fn find_identity(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
