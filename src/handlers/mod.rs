//! HTTP handlers, one module per resource.
//!
//! Reads are open to everyone. Every mutating handler takes [`AdminUser`]
//! as its first extractor, so an unauthenticated or non-staff caller is
//! rejected before the body is even decoded.
//!
//! [`AdminUser`]: crate::auth::AdminUser

pub mod contact_info;
pub mod content;
pub mod home_stats;
pub mod projects;
pub mod services;
pub mod testimonials;
pub mod uploads;

/// health
///
/// Liveness probe. Does not touch the content store.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// Raw query string as ordered key/value pairs. Repeated keys are allowed.
pub type QueryPairs = Vec<(String, String)>;

/// Last value given for `key`, so `?limit=1&limit=2` reads as `limit=2`.
pub(crate) fn last_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// `featured=true` turns the filter on; any other value (or none) leaves it off.
pub(crate) fn featured_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Only a non-empty run of ASCII digits is a limit. Anything else is ignored.
pub(crate) fn parse_limit(value: Option<&str>) -> Option<usize> {
    value
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|v| v.parse().ok())
}
