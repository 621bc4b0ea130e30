use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, DatabaseConfig};

/// Errors from the entity store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Builds and maintains the PostgreSQL connection pool
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured database
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
        let connection_string = config.connection_string()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!(
            "Created database pool for {} on {} (max {} connections)",
            config.database_name, config.host, config.max_connections
        );
        Ok(pool)
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(pool: &PgPool) -> DatabaseResult<()> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> DatabaseResult<()> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
