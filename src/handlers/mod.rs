// handlers/mod.rs - Two tiers
//
// Public (no session) and protected (identity required, 401 otherwise).
// Page requests are gated separately by `middleware::gate`.

use axum::http::Uri;

pub mod protected;
pub mod public;

/// Path plus query string, as received
pub(crate) fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}
