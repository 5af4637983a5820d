//! CORS layer configuration.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use lobby_core::config::ServerConfig;

/// Builds a CORS tower layer for `server.client_origin`.
///
/// Credentials are allowed, so a wildcard origin is answered by echoing the
/// request's `Origin`.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = config.client_origin.trim();
    let allow_origin = if origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Invalid client origin, mirroring requests");
                AllowOrigin::mirror_request()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}
