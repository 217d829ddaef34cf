use axum::extract::State;

use crate::database::models::{CompatibilityMatrix, CompatibilityRecord};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/compatibility - `{bank: {format: status}}`
pub async fn compatibility_get(State(state): State<AppState>) -> ApiResult<CompatibilityMatrix> {
    let records = state.db.compatibility().list().await?;
    Ok(ApiResponse::success(CompatibilityRecord::nest(records)))
}
