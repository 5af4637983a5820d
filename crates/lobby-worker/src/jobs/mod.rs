//! Built-in scheduled job implementations.

pub mod cache_sweep;
pub mod request_log_cleanup;
