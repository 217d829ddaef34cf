use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::database::{push_period, round2, DatabaseError};
use crate::types::{group_color, Period, TransactionType};

/// Headline numbers for a period. Rows flagged `IgnorarDashboard` are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_despesas: f64,
    pub total_receitas: f64,
    pub saldo_atual: f64,
    pub total_transacoes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub grupo: String,
    pub total: f64,
    pub quantidade: i64,
    pub percentual: f64,
    pub cor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub mes: String,
    pub receitas: f64,
    pub despesas: f64,
    pub saldo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    pub grupo: String,
    pub meta: f64,
    pub realizado: f64,
    pub percentual: f64,
}

#[derive(FromRow)]
struct MetricsRow {
    total_despesas: f64,
    total_receitas: f64,
    total_transacoes: i64,
}

#[derive(FromRow)]
struct CategoryRow {
    grupo: String,
    total: f64,
    quantidade: i64,
    cor: Option<String>,
}

#[derive(FromRow)]
struct MonthRow {
    mes: String,
    receitas: f64,
    despesas: f64,
}

#[derive(FromRow)]
struct BudgetRow {
    grupo: String,
    meta: f64,
    realizado: f64,
}

pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn metrics(&self, period: &Period) -> Result<DashboardMetrics, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT TOTAL(CASE WHEN TipoTransacao IN (");
        qb.push_bind(TransactionType::Expense.as_str());
        qb.push(", ");
        qb.push_bind(TransactionType::CreditCard.as_str());
        qb.push(") THEN ValorPositivo END) AS total_despesas, TOTAL(CASE WHEN TipoTransacao = ");
        qb.push_bind(TransactionType::Income.as_str());
        qb.push(
            " THEN ValorPositivo END) AS total_receitas, COUNT(*) AS total_transacoes \
             FROM journal_entries WHERE IgnorarDashboard = 0",
        );
        push_period(&mut qb, period);

        let row = qb.build_query_as::<MetricsRow>().fetch_one(&self.pool).await?;

        Ok(DashboardMetrics {
            total_despesas: round2(row.total_despesas),
            total_receitas: round2(row.total_receitas),
            saldo_atual: round2(row.total_receitas - row.total_despesas),
            total_transacoes: row.total_transacoes,
        })
    }

    /// Spending per group, largest first, with share of the period total
    pub async fn categories(&self, period: &Period) -> Result<Vec<CategoryBreakdown>, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT j.GRUPO AS grupo, TOTAL(j.ValorPositivo) AS total, COUNT(*) AS quantidade, MAX(c.cor) AS cor \
             FROM journal_entries j LEFT JOIN categories c ON c.nome = j.GRUPO \
             WHERE j.IgnorarDashboard = 0 AND j.GRUPO IS NOT NULL AND j.TipoTransacao IN (",
        );
        qb.push_bind(TransactionType::Expense.as_str());
        qb.push(", ");
        qb.push_bind(TransactionType::CreditCard.as_str());
        qb.push(")");
        push_period(&mut qb, period);
        qb.push(" GROUP BY j.GRUPO ORDER BY total DESC");

        let rows = qb.build_query_as::<CategoryRow>().fetch_all(&self.pool).await?;
        let grand_total: f64 = rows.iter().map(|r| r.total).sum();

        Ok(rows
            .into_iter()
            .map(|r| {
                let percentual = if grand_total > 0.0 { r.total * 100.0 / grand_total } else { 0.0 };
                let cor = r.cor.unwrap_or_else(|| group_color(&r.grupo).to_string());
                CategoryBreakdown {
                    grupo: r.grupo,
                    total: round2(r.total),
                    quantidade: r.quantidade,
                    percentual: round2(percentual),
                    cor,
                }
            })
            .collect())
    }

    /// Twelve entries for `year`; months without rows are zero
    pub async fn monthly_chart(&self, year: &str) -> Result<Vec<MonthlyTotals>, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT MesFatura AS mes, TOTAL(CASE WHEN TipoTransacao = ");
        qb.push_bind(TransactionType::Income.as_str());
        qb.push(" THEN ValorPositivo END) AS receitas, TOTAL(CASE WHEN TipoTransacao IN (");
        qb.push_bind(TransactionType::Expense.as_str());
        qb.push(", ");
        qb.push_bind(TransactionType::CreditCard.as_str());
        qb.push(") THEN ValorPositivo END) AS despesas FROM journal_entries WHERE IgnorarDashboard = 0");
        push_period(&mut qb, &Period::Year(year.to_string()));
        qb.push(" GROUP BY MesFatura ORDER BY MesFatura");

        let rows = qb.build_query_as::<MonthRow>().fetch_all(&self.pool).await?;

        Ok((1..=12)
            .map(|m| {
                let mes = format!("{}{:02}", year, m);
                let (receitas, despesas) = rows
                    .iter()
                    .find(|r| r.mes == mes)
                    .map(|r| (r.receitas, r.despesas))
                    .unwrap_or((0.0, 0.0));
                MonthlyTotals {
                    mes,
                    receitas: round2(receitas),
                    despesas: round2(despesas),
                    saldo: round2(receitas - despesas),
                }
            })
            .collect())
    }

    /// Budget targets of a month next to what was actually spent per group
    pub async fn budget_vs_actual(&self, mes_fatura: &str) -> Result<Vec<BudgetComparison>, DatabaseError> {
        let rows = sqlx::query_as::<_, BudgetRow>(
            "SELECT m.GRUPO AS grupo, m.Valor AS meta, \
               (SELECT TOTAL(j.ValorPositivo) FROM journal_entries j \
                 WHERE j.GRUPO = m.GRUPO AND j.MesFatura = m.MesReferencia \
                   AND j.IgnorarDashboard = 0 AND j.TipoTransacao IN (?, ?)) AS realizado \
             FROM budget_metas m WHERE m.MesReferencia = ? ORDER BY m.GRUPO",
        )
        .bind(TransactionType::Expense.as_str())
        .bind(TransactionType::CreditCard.as_str())
        .bind(mes_fatura)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| BudgetComparison {
                percentual: if r.meta > 0.0 { round2(r.realizado * 100.0 / r.meta) } else { 0.0 },
                grupo: r.grupo,
                meta: round2(r.meta),
                realizado: round2(r.realizado),
            })
            .collect())
    }
}
