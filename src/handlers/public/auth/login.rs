use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::cookies::session_cookie;
use crate::auth::{generate_jwt, verify_password, AuthError, Claims, Identity};
use crate::config::AuthMode;
use crate::error::ApiError;
use crate::handlers::path_and_query;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
    pub expires_at: i64,
}

/// POST /api/v1/auth/login - Verify credentials and open a session
///
/// Input: `{"username": "...", "password": "..."}`. On success the session
/// cookie is set and the token is also returned in `data.token` for
/// non-browser clients.
pub async fn login_post(
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

    let request: LoginRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_json(format!("Invalid login body: {}", e)))?;

    let username = request.username.trim();
    let mut missing = Vec::new();
    if username.is_empty() {
        missing.push("username");
    }
    if request.password.is_empty() {
        missing.push("password");
    }
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(&missing));
    }

    let user = match state.db.users().find_by_username(username).await? {
        Some(user) if verify_password(&request.password, &user.password_hash)? => user,
        _ => {
            warn!("Failed login attempt for '{}'", username);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let security = &state.config.security;
    let claims = Claims::new(&user.username, user.id, security.jwt_expiry_hours);
    let token = generate_jwt(&claims, security)?;
    let cookie = session_cookie(security, &token, claims.exp - claims.iat);

    info!("User '{}' logged in", user.username);

    let data = LoginResponse {
        token,
        user: Identity {
            username: user.username,
            user_id: Some(user.id),
            expires_at: Some(claims.exp),
        },
        expires_at: claims.exp,
    };

    Ok(([(header::SET_COOKIE, cookie)], ApiResponse::success(data)).into_response())
}
