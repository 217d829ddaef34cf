use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::auth::{AuthError, Credentials, Identity};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions
pub type AuthUser = Identity;

/// API authentication: session cookie or bearer token, checked by the
/// configured identity provider. Failures answer 401 JSON.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credentials = Credentials::from_headers(
        request.headers(),
        &state.config.security.session_cookie_name,
    );

    if credentials.is_empty() {
        return ApiError::from(AuthError::MissingCredentials).into_response();
    }

    match state.identity.identify(&credentials).await {
        Ok(Some(identity)) => {
            debug!("Authenticated {} for {}", identity.username, request.uri().path());
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => ApiError::unauthorized("Session expired or invalid").into_response(),
        Err(e) => {
            warn!("Identity check failed for {}: {}", request.uri().path(), e);
            ApiError::from(e).into_response()
        }
    }
}
