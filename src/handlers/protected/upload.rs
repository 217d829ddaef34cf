use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
};

use crate::error::ApiError;
use crate::handlers::path_and_query;
use crate::state::AppState;

/// ANY /api/v1/upload[/*rest] - Statement upload, handled by the upstream
/// parsing service. Status and body come back unchanged.
pub async fn upload_forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let response = state
        .upstream
        .forward(method, path_and_query(&uri), &headers, body)
        .await?;
    Ok(response)
}
