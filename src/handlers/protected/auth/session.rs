use axum::Extension;

use crate::middleware::{ApiResponse, AuthUser};

/// GET /api/v1/auth/whoami - Identity attached by the auth middleware
///
/// ```json
/// { "success": true, "data": { "username": "ana", "user_id": 1, "expires_at": 1767225600 } }
/// ```
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResponse<AuthUser> {
    ApiResponse::success(user)
}
