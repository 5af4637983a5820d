//! # lobby-database
//!
//! The identity store behind the hub: PostgreSQL connection management,
//! the `users` lookup the authenticator falls back to on a cache miss, an
//! in-process store with the same contract, and the HTTP request log.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use repositories::{MemoryUserStore, RequestLogRepository, UserRepository};
pub use store::IdentityStore;
