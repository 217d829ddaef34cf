use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{FilterOptions, JournalEntry, NewMarcacao, TransactionUpdate};
use crate::database::TransactionFilter;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{Period, TransactionType};

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub search: Option<String>,
    pub tipo: Option<String>,
    pub grupo: Option<String>,
    pub subgrupo: Option<String>,
    pub estabelecimento: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl PeriodQuery {
    pub fn period(&self) -> Result<Period, ApiError> {
        Ok(Period::from_query(self.year.as_deref(), self.month.as_deref())?)
    }
}

impl TransactionQuery {
    fn into_filter(self) -> Result<TransactionFilter, ApiError> {
        let period = Period::from_query(self.year.as_deref(), self.month.as_deref())?;
        let tipo = match self.tipo.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<TransactionType>().map_err(ApiError::bad_request)?),
            None => None,
        };
        if matches!(self.limit, Some(l) if l < 1) {
            return Err(ApiError::bad_request("limit must be positive"));
        }
        if matches!(self.offset, Some(o) if o < 0) {
            return Err(ApiError::bad_request("offset must not be negative"));
        }

        Ok(TransactionFilter {
            search: self.search,
            tipo,
            grupo: self.grupo,
            subgrupo: self.subgrupo,
            estabelecimento: self.estabelecimento,
            period,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// GET /api/v1/transactions - Filtered journal entries, newest first
pub async fn transactions_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> ApiResult<Vec<JournalEntry>> {
    let filter = query.into_filter()?;
    let rows = state.db.transactions().list(&filter).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/v1/transactions/filters - Distinct values for filter selects
pub async fn filters_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<FilterOptions> {
    let options = state.db.transactions().filter_options(&query.period()?).await?;
    Ok(ApiResponse::success(options))
}

/// GET /api/v1/transactions/:id
pub async fn transaction_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JournalEntry> {
    state
        .db
        .transactions()
        .get(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/v1/transactions/:id - Change any of the classification labels
/// or the dashboard flag
pub async fn transaction_patch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<TransactionUpdate>,
) -> ApiResult<JournalEntry> {
    if changes.is_empty() {
        return Err(ApiError::bad_request(
            "No updatable fields provided (GRUPO, SUBGRUPO, TipoGasto, IgnorarDashboard)",
        ));
    }
    let blank: Vec<&str> = [
        ("GRUPO", &changes.grupo),
        ("SUBGRUPO", &changes.subgrupo),
        ("TipoGasto", &changes.tipo_gasto),
    ]
    .iter()
    .filter(|(_, v)| v.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false))
    .map(|(k, _)| *k)
    .collect();
    if !blank.is_empty() {
        return Err(ApiError::missing_fields(&blank));
    }

    state
        .db
        .transactions()
        .update(id, &changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/v1/transactions/:id - Reclassify with the full label triple
pub async fn transaction_put(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<NewMarcacao>,
) -> ApiResult<JournalEntry> {
    let labels = body.normalized().map_err(|missing| ApiError::missing_fields(&missing))?;
    let changes = TransactionUpdate {
        grupo: Some(labels.grupo),
        subgrupo: Some(labels.subgrupo),
        tipo_gasto: Some(labels.tipo_gasto),
        ignorar_dashboard: None,
    };

    state
        .db
        .transactions()
        .update(id, &changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Transaction {} not found", id))
}
