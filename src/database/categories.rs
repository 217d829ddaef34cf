use sqlx::SqlitePool;

use crate::database::models::{Category, NewCategory};
use crate::database::DatabaseError;

const DUPLICATE_MESSAGE: &str = "Categoria já existe";

pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, nome, tipo, cor FROM categories ORDER BY nome")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(&self, new: &NewCategory) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (nome, tipo, cor) VALUES (?, ?, ?) RETURNING id, nome, tipo, cor",
        )
        .bind(new.nome.trim())
        .bind(&new.tipo)
        .bind(&new.cor)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::conflict_or(e, DUPLICATE_MESSAGE))
    }

    pub async fn update(&self, id: i64, new: &NewCategory) -> Result<Option<Category>, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET nome = ?, tipo = ?, cor = ? WHERE id = ? RETURNING id, nome, tipo, cor",
        )
        .bind(new.nome.trim())
        .bind(&new.tipo)
        .bind(&new.cor)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::conflict_or(e, DUPLICATE_MESSAGE))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
