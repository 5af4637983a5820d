//! PostgreSQL-backed HTTP request log.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lobby_core::error::{AppError, ErrorKind};
use lobby_core::result::AppResult;
use lobby_entity::NewRequestLog;

/// Repository for request log rows.
#[derive(Debug, Clone)]
pub struct RequestLogRepository {
    pool: PgPool,
}

impl RequestLogRepository {
    /// Create a new request log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one request log row and return its id.
    pub async fn create(&self, data: &NewRequestLog) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO request_logs \
             (request_time, response_time, user_id, duration, method, path, headers, body, response) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(data.request_time)
        .bind(data.response_time)
        .bind(data.user_id)
        .bind(data.duration_seconds())
        .bind(&data.method)
        .bind(&data.path)
        .bind(&data.headers)
        .bind(&data.body)
        .bind(&data.response)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create request log", e))
    }

    /// Delete rows whose request arrived before `before`.
    pub async fn cleanup_old(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM request_logs WHERE request_time < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to cleanup request logs", e)
            })?;
        Ok(result.rows_affected())
    }
}
