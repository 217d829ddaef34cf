use sqlx::SqlitePool;

use crate::database::models::CompatibilityRecord;
use crate::database::DatabaseError;

pub struct CompatibilityRepository {
    pool: SqlitePool,
}

impl CompatibilityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CompatibilityRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, CompatibilityRecord>(
            "SELECT bank_name, file_format, status FROM bank_format_compatibility ORDER BY bank_name, file_format",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
