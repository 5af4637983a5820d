//! # lobby-auth
//!
//! Authentication for Lobby.
//!
//! ## Modules
//!
//! - `jwt`: bearer token verification (the hub's token validator) and issuance
//! - `credential`: pulling the bearer credential out of a query string or header
//! - `identity`: validator → session cache → identity store resolution, shared
//!   by the WebSocket hub and the HTTP authenticator

pub mod credential;
pub mod identity;
pub mod jwt;

pub use credential::{bearer_token, extract_credential};
pub use identity::{AuthFailure, IdentityResolver};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
