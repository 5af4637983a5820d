//! # lobby-entity
//!
//! Domain entity models for Lobby. Every struct in this crate represents a
//! database table row or a value object copied out of one. Entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and table rows additionally
//! derive `sqlx::FromRow`.

pub mod request_log;
pub mod user;

pub use request_log::{NewRequestLog, RequestLog};
pub use user::User;
