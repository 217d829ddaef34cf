use axum::extract::State;
use chrono::Datelike;

use crate::database::dashboard::{BudgetComparison, CategoryBreakdown, DashboardMetrics, MonthlyTotals};
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::handlers::protected::transactions::PeriodQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Period;

/// GET /api/v1/dashboard/metrics - Totals for the period (`year`, `month`)
pub async fn metrics_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<DashboardMetrics> {
    let metrics = state.db.dashboard().metrics(&query.period()?).await?;
    Ok(ApiResponse::success(metrics))
}

/// GET /api/v1/dashboard/categories - Spending per group
pub async fn categories_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Vec<CategoryBreakdown>> {
    let breakdown = state.db.dashboard().categories(&query.period()?).await?;
    Ok(ApiResponse::success(breakdown))
}

/// GET /api/v1/dashboard/chart - Month by month totals of `year`
/// (current year when absent)
pub async fn chart_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Vec<MonthlyTotals>> {
    let year = match query.year.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(year) => year.to_string(),
        None => chrono::Utc::now().year().to_string(),
    };
    let year = match Period::from_query(Some(&year), None)? {
        Period::Year(year) => year,
        _ => return Err(ApiError::bad_request("year is required")),
    };

    let chart = state.db.dashboard().monthly_chart(&year).await?;
    Ok(ApiResponse::success(chart))
}

/// GET /api/v1/dashboard/budget - Budget against actual spending for a month
pub async fn budget_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Vec<BudgetComparison>> {
    let period = query.period()?;
    let mes = period
        .mes_fatura()
        .ok_or_else(|| ApiError::bad_request("year and month are required"))?;

    let comparison = state.db.dashboard().budget_vs_actual(mes).await?;
    Ok(ApiResponse::success(comparison))
}
