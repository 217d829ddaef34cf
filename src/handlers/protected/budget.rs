use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{BudgetMeta, NewBudgetMeta};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Period;

#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    /// `YYYYMM`
    pub mes: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl BudgetQuery {
    fn mes_referencia(&self) -> Result<String, ApiError> {
        let period = match self.mes.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(mes) => Period::from_mes_fatura(mes)?,
            None => Period::from_query(self.year.as_deref(), self.month.as_deref())?,
        };
        period
            .mes_fatura()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("mes (YYYYMM) or year and month are required"))
    }
}

/// GET /api/v1/budget?mes=YYYYMM - Targets of one month
pub async fn budget_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BudgetQuery>,
) -> ApiResult<Vec<BudgetMeta>> {
    let mes = query.mes_referencia()?;
    Ok(ApiResponse::success(state.db.budget().list(&mes).await?))
}

/// PUT /api/v1/budget - Create or replace the target of (MesReferencia, GRUPO)
pub async fn budget_put(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewBudgetMeta>,
) -> ApiResult<BudgetMeta> {
    let mes = Period::from_mes_fatura(&body.mes_referencia)?;
    let grupo = body.grupo.trim();
    if grupo.is_empty() {
        return Err(ApiError::missing_fields(&["GRUPO"]));
    }
    if !body.valor.is_finite() || body.valor < 0.0 {
        return Err(ApiError::bad_request("Valor must be a non-negative number"));
    }

    let meta = NewBudgetMeta {
        mes_referencia: mes.mes_fatura().unwrap_or_default().to_string(),
        grupo: grupo.to_string(),
        valor: body.valor,
    };
    Ok(ApiResponse::success(state.db.budget().upsert(&meta).await?))
}

/// DELETE /api/v1/budget/:id
pub async fn budget_delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    if state.db.budget().delete(id).await? {
        Ok(ApiResponse::no_content())
    } else {
        Err(ApiError::not_found(format!("Budget target {} not found", id)))
    }
}
