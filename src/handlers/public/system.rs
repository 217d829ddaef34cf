use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET / - Service info
pub async fn root(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Finance API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal finance data API over SQLite",
        "auth_mode": state.config.security.auth_mode,
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/v1/auth/login, /api/v1/auth/logout (public), /api/v1/auth/whoami (protected)",
            "transactions": "/api/v1/transactions[/:id|/filters] (protected)",
            "dashboard": "/api/v1/dashboard/{metrics,categories,chart,budget} (protected)",
            "marcacoes": "/api/v1/marcacoes[/:id|/grupos|/subgrupos] (protected)",
            "categories": "/api/v1/categories[/:id] (protected)",
            "compatibility": "/api/v1/compatibility (protected)",
            "budget": "/api/v1/budget[/:id] (protected)",
            "upload": "/api/v1/upload/* (protected, forwarded upstream)",
        }
    }))
}

/// GET /health - Database ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
