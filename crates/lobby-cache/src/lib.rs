//! # lobby-cache
//!
//! In-process cache of authenticated identity records, shared by the
//! WebSocket hub and the HTTP request authenticator.
//!
//! Entries expire lazily on read and are physically removed by
//! [`SessionCache::sweep`], which an external scheduler invokes.

pub mod session;

pub use session::SessionCache;
