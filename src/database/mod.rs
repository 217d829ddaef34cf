pub mod budget;
pub mod categories;
pub mod compatibility;
pub mod dashboard;
pub mod marcacoes;
pub mod models;
pub mod transactions;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::types::Period;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use compatibility::CompatibilityRepository;
pub use dashboard::DashboardRepository;
pub use marcacoes::MarcacaoRepository;
pub use transactions::{TransactionFilter, TransactionRepository};
pub use users::UserRepository;

/// Errors from the data-access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a UNIQUE violation to `Conflict`, pass anything else through
    pub(crate) fn conflict_or(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(message.to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Process-wide handle to the SQLite store. Opened once at startup,
/// cloned into the router state, closed on shutdown.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl(config.url.clone()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Opened database pool for: {}", config.url);
        Ok(Self { pool })
    }

    /// Private in-memory database. A single connection that never idles out,
    /// since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|_| DatabaseError::InvalidDatabaseUrl("sqlite::memory:".to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    pub fn marcacoes(&self) -> MarcacaoRepository {
        MarcacaoRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn compatibility(&self) -> CompatibilityRepository {
        CompatibilityRepository::new(self.pool.clone())
    }

    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.pool.clone())
    }

    pub fn budget(&self) -> BudgetRepository {
        BudgetRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }
}

/// Append ` AND <period condition>` on `MesFatura` with bound values
pub(crate) fn push_period(qb: &mut QueryBuilder<'_, Sqlite>, period: &Period) {
    match period {
        Period::All => {}
        Period::Year(year) => {
            qb.push(" AND substr(MesFatura, 1, 4) = ");
            qb.push_bind(year.clone());
        }
        Period::Month(mes) => {
            qb.push(" AND MesFatura = ");
            qb.push_bind(mes.clone());
        }
    }
}

/// Round money values to cents for presentation
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
