//! # lobby-core
//!
//! Core crate for Lobby. Contains the configuration schema, the unified
//! error system, and the traits that the hub consumes from its external
//! collaborators.
//!
//! This crate has **no** internal dependencies on other Lobby crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
