use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::database::models::journal_entry::JOURNAL_ENTRY_COLUMNS;
use crate::database::models::{FilterOptions, JournalEntry, TransactionUpdate};
use crate::database::{push_period, DatabaseError};
use crate::types::{Period, TransactionType};

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Filters for listing journal entries. Every value is bound, never spliced.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub search: Option<String>,
    pub tipo: Option<TransactionType>,
    pub grupo: Option<String>,
    pub subgrupo: Option<String>,
    pub estabelecimento: Option<String>,
    pub period: Period,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<JournalEntry>, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM journal_entries WHERE 1=1",
            JOURNAL_ENTRY_COLUMNS
        ));

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (Estabelecimento LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" ESCAPE '\\' OR GRUPO LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" ESCAPE '\\' OR SUBGRUPO LIKE ");
            qb.push_bind(pattern);
            qb.push(" ESCAPE '\\')");
        }
        if let Some(tipo) = filter.tipo {
            qb.push(" AND TipoTransacao = ");
            qb.push_bind(tipo.as_str());
        }
        if let Some(grupo) = non_empty(&filter.grupo) {
            qb.push(" AND GRUPO = ");
            qb.push_bind(grupo.to_string());
        }
        if let Some(subgrupo) = non_empty(&filter.subgrupo) {
            qb.push(" AND SUBGRUPO = ");
            qb.push_bind(subgrupo.to_string());
        }
        if let Some(estabelecimento) = non_empty(&filter.estabelecimento) {
            qb.push(" AND Estabelecimento LIKE ");
            qb.push_bind(like_pattern(estabelecimento));
            qb.push(" ESCAPE '\\'");
        }
        push_period(&mut qb, &filter.period);

        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);
        qb.push(" ORDER BY Data DESC, id DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build_query_as::<JournalEntry>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Option<JournalEntry>, DatabaseError> {
        let sql = format!("SELECT {} FROM journal_entries WHERE id = ?", JOURNAL_ENTRY_COLUMNS);
        let row = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply the present fields in one UPDATE. `None` when no row has `id`.
    pub async fn update(
        &self,
        id: i64,
        changes: &TransactionUpdate,
    ) -> Result<Option<JournalEntry>, DatabaseError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE journal_entries SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(grupo) = &changes.grupo {
                set.push("GRUPO = ");
                set.push_bind_unseparated(grupo.trim().to_string());
            }
            if let Some(subgrupo) = &changes.subgrupo {
                set.push("SUBGRUPO = ");
                set.push_bind_unseparated(subgrupo.trim().to_string());
            }
            if let Some(tipo_gasto) = &changes.tipo_gasto {
                set.push("TipoGasto = ");
                set.push_bind_unseparated(tipo_gasto.trim().to_string());
            }
            if let Some(ignorar) = changes.ignorar_dashboard {
                set.push("IgnorarDashboard = ");
                set.push_bind_unseparated(ignorar);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(JOURNAL_ENTRY_COLUMNS);

        let row = qb
            .build_query_as::<JournalEntry>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Distinct labels within a period, for filter dropdowns
    pub async fn filter_options(&self, period: &Period) -> Result<FilterOptions, DatabaseError> {
        Ok(FilterOptions {
            grupos: self.distinct("GRUPO", period).await?,
            subgrupos: self.distinct("SUBGRUPO", period).await?,
            estabelecimentos: self.distinct("Estabelecimento", period).await?,
            tipos: self.distinct("TipoTransacao", period).await?,
        })
    }

    // `column` is always one of the literals above
    async fn distinct(&self, column: &'static str, period: &Period) -> Result<Vec<String>, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT DISTINCT {col} FROM journal_entries WHERE {col} IS NOT NULL AND {col} <> ''",
            col = column
        ));
        push_period(&mut qb, period);
        qb.push(format!(" ORDER BY {}", column));

        let values = qb.build_query_scalar::<String>().fetch_all(&self.pool).await?;
        Ok(values)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `%term%` with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
