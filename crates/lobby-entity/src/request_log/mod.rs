//! HTTP request log entities.

pub mod model;

pub use model::{NewRequestLog, RequestLog};
