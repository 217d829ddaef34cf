use sqlx::SqlitePool;

use crate::database::models::{BudgetMeta, NewBudgetMeta};
use crate::database::DatabaseError;

const META_COLUMNS: &str = "id, MesReferencia AS mes_referencia, GRUPO AS grupo, Valor AS valor";

pub struct BudgetRepository {
    pool: SqlitePool,
}

impl BudgetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, mes_referencia: &str) -> Result<Vec<BudgetMeta>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM budget_metas WHERE MesReferencia = ? ORDER BY GRUPO",
            META_COLUMNS
        );
        let rows = sqlx::query_as::<_, BudgetMeta>(&sql)
            .bind(mes_referencia)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert or replace the target for (month, group)
    pub async fn upsert(&self, meta: &NewBudgetMeta) -> Result<BudgetMeta, DatabaseError> {
        let sql = format!(
            "INSERT INTO budget_metas (MesReferencia, GRUPO, Valor) VALUES (?, ?, ?) \
             ON CONFLICT (MesReferencia, GRUPO) DO UPDATE SET Valor = excluded.Valor \
             RETURNING {}",
            META_COLUMNS
        );
        let row = sqlx::query_as::<_, BudgetMeta>(&sql)
            .bind(&meta.mes_referencia)
            .bind(meta.grupo.trim())
            .bind(meta.valor)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM budget_metas WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
