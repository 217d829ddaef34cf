use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use crate::database::models::{Marcacao, NewMarcacao};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SubgruposQuery {
    pub grupo: Option<String>,
}

/// GET /api/v1/marcacoes - All classification triples
pub async fn marcacoes_get(State(state): State<AppState>) -> ApiResult<Vec<Marcacao>> {
    let rows = state.db.marcacoes().list().await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/marcacoes - Register a new triple (201, 409 on duplicate)
pub async fn marcacoes_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewMarcacao>,
) -> ApiResult<Marcacao> {
    let new = body.normalized().map_err(|missing| ApiError::missing_fields(&missing))?;
    let created = state.db.marcacoes().create(&new).await?;
    info!("Created marcação {} ({} / {} / {})", created.id, created.grupo, created.subgrupo, created.tipo_gasto);
    Ok(ApiResponse::created(created))
}

/// PUT /api/v1/marcacoes/:id
pub async fn marcacao_put(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<NewMarcacao>,
) -> ApiResult<Marcacao> {
    let new = body.normalized().map_err(|missing| ApiError::missing_fields(&missing))?;
    state
        .db
        .marcacoes()
        .update(id, &new)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/marcacoes/:id - Hard delete (204)
pub async fn marcacao_delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    if state.db.marcacoes().delete(id).await? {
        info!("Deleted marcação {}", id);
        Ok(ApiResponse::no_content())
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/marcacoes/grupos
pub async fn grupos_get(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(state.db.marcacoes().grupos().await?))
}

/// GET /api/v1/marcacoes/subgrupos?grupo=
pub async fn subgrupos_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubgruposQuery>,
) -> ApiResult<Vec<String>> {
    let grupo = query.grupo.as_deref().map(str::trim).filter(|g| !g.is_empty());
    Ok(ApiResponse::success(state.db.marcacoes().subgrupos(grupo).await?))
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Marcação {} not found", id))
}
