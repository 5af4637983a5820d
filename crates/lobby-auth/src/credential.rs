//! Locating the bearer credential on an incoming request.

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Any other scheme, or a scheme with no token, yields `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("Bearer") => Some(token),
        _ => None,
    }
}

/// Pick the credential for a request.
///
/// A non-blank `token` query parameter wins; otherwise the bearer header is
/// consulted. Browsers cannot set headers on a WebSocket upgrade, so the
/// query form is what clients of `/ws` use.
pub fn extract_credential<'a>(
    query_token: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    query_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| authorization.and_then(bearer_token))
}
