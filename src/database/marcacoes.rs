use sqlx::SqlitePool;

use crate::database::models::{Marcacao, NewMarcacao};
use crate::database::DatabaseError;

pub const DUPLICATE_MESSAGE: &str = "Esta combinação já existe";

const MARCACAO_COLUMNS: &str = "id, GRUPO AS grupo, SUBGRUPO AS subgrupo, TipoGasto AS tipo_gasto";

pub struct MarcacaoRepository {
    pool: SqlitePool,
}

impl MarcacaoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Marcacao>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM base_marcacoes ORDER BY GRUPO, SUBGRUPO, TipoGasto",
            MARCACAO_COLUMNS
        );
        let rows = sqlx::query_as::<_, Marcacao>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Whether the triple is already registered, optionally ignoring one id
    pub async fn exists(&self, new: &NewMarcacao, except_id: Option<i64>) -> Result<bool, DatabaseError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM base_marcacoes \
             WHERE GRUPO = ? AND SUBGRUPO = ? AND TipoGasto = ? AND id <> ?",
        )
        .bind(&new.grupo)
        .bind(&new.subgrupo)
        .bind(&new.tipo_gasto)
        .bind(except_id.unwrap_or(-1))
        .fetch_one(&self.pool)
        .await?;
        Ok(found > 0)
    }

    /// Insert a new triple. Checked up front, with the UNIQUE constraint
    /// catching a concurrent insert of the same triple.
    pub async fn create(&self, new: &NewMarcacao) -> Result<Marcacao, DatabaseError> {
        if self.exists(new, None).await? {
            return Err(DatabaseError::Conflict(DUPLICATE_MESSAGE.to_string()));
        }

        let sql = format!(
            "INSERT INTO base_marcacoes (GRUPO, SUBGRUPO, TipoGasto) VALUES (?, ?, ?) RETURNING {}",
            MARCACAO_COLUMNS
        );
        sqlx::query_as::<_, Marcacao>(&sql)
            .bind(&new.grupo)
            .bind(&new.subgrupo)
            .bind(&new.tipo_gasto)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::conflict_or(e, DUPLICATE_MESSAGE))
    }

    /// `None` when no row has `id`, whatever the body holds
    pub async fn update(&self, id: i64, new: &NewMarcacao) -> Result<Option<Marcacao>, DatabaseError> {
        let present: Option<i64> = sqlx::query_scalar("SELECT id FROM base_marcacoes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if present.is_none() {
            return Ok(None);
        }
        if self.exists(new, Some(id)).await? {
            return Err(DatabaseError::Conflict(DUPLICATE_MESSAGE.to_string()));
        }

        let sql = format!(
            "UPDATE base_marcacoes SET GRUPO = ?, SUBGRUPO = ?, TipoGasto = ? WHERE id = ? RETURNING {}",
            MARCACAO_COLUMNS
        );
        sqlx::query_as::<_, Marcacao>(&sql)
            .bind(&new.grupo)
            .bind(&new.subgrupo)
            .bind(&new.tipo_gasto)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::conflict_or(e, DUPLICATE_MESSAGE))
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM base_marcacoes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn grupos(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = sqlx::query_scalar::<_, String>("SELECT DISTINCT GRUPO FROM base_marcacoes ORDER BY GRUPO")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn subgrupos(&self, grupo: Option<&str>) -> Result<Vec<String>, DatabaseError> {
        let rows = match grupo {
            Some(grupo) => {
                sqlx::query_scalar::<_, String>(
                    "SELECT DISTINCT SUBGRUPO FROM base_marcacoes WHERE GRUPO = ? ORDER BY SUBGRUPO",
                )
                .bind(grupo)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, String>("SELECT DISTINCT SUBGRUPO FROM base_marcacoes ORDER BY SUBGRUPO")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}
