use axum::extract::State;

use crate::database::models::{Category, NewCategory};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::TransactionType;

/// GET /api/v1/categories
pub async fn categories_get(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.db.categories().list().await?))
}

/// POST /api/v1/categories - 201, 409 when `nome` is taken
pub async fn categories_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCategory>,
) -> ApiResult<Category> {
    let new = validate(body)?;
    Ok(ApiResponse::created(state.db.categories().create(&new).await?))
}

/// PUT /api/v1/categories/:id
pub async fn category_put(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<NewCategory>,
) -> ApiResult<Category> {
    let new = validate(body)?;
    state
        .db
        .categories()
        .update(id, &new)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/categories/:id
pub async fn category_delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    if state.db.categories().delete(id).await? {
        Ok(ApiResponse::no_content())
    } else {
        Err(not_found(id))
    }
}

/// Trim the name, store the canonical type label, check the color
fn validate(body: NewCategory) -> Result<NewCategory, ApiError> {
    let nome = body.nome.trim().to_string();
    if nome.is_empty() {
        return Err(ApiError::missing_fields(&["nome"]));
    }
    let tipo = body.tipo.parse::<TransactionType>().map_err(ApiError::bad_request)?;
    let cor = match body.cor.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(cor) if is_hex_color(cor) => Some(cor.to_string()),
        Some(cor) => return Err(ApiError::bad_request(format!("cor must be #RGB or #RRGGBB, got '{}'", cor))),
        None => None,
    };

    Ok(NewCategory {
        nome,
        tipo: tipo.as_str().to_string(),
        cor,
    })
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Category {} not found", id))
}
