use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::auth::cookies::clear_session_cookie;
use crate::config::AuthMode;
use crate::error::ApiError;
use crate::handlers::path_and_query;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auth/logout - Expire the session cookie (204)
pub async fn logout_post(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if state.config.security.auth_mode == AuthMode::Upstream {
        let response = state
            .upstream
            .forward(method, path_and_query(&uri), &headers, body)
            .await?;
        return Ok(response);
    }

    let cookie = clear_session_cookie(&state.config.security);
    Ok(([(header::SET_COOKIE, cookie)], ApiResponse::no_content()).into_response())
}
