//! # lobby-api
//!
//! HTTP layer for Lobby built on Axum.
//!
//! Provides the WebSocket upgrade endpoint, the health endpoint, bearer-token
//! protected routes, middleware (auth, CORS, logging), extractors, and
//! error mapping.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
