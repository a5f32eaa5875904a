use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub(crate) mod error;
pub(crate) mod models;
mod postgres;
pub(crate) mod repositories;

use error::{DbError, Result};
use postgres::{
    market_series::PgMarketSeriesRepo, trends::PgTrendsRepo, users::PgUsersRepo,
};
use repositories::{MarketSeriesRepository, TrendsRepository, UsersRepository};

/// Primary database interface.
///
/// Provides access to repositories for the wide price tables, the trend catalog, and users.
/// Uses PostgreSQL as the underlying storage engine with automatic migrations. All repositories
/// share a single connection pool.
pub struct Database {
    pub(crate) market_series: Box<dyn MarketSeriesRepository>,
    pub(crate) trends: Box<dyn TrendsRepository>,
    pub(crate) users: Box<dyn UsersRepository>,
}

impl Database {
    /// Creates a new database instance and runs migrations.
    ///
    /// Establishes a connection pool of at most `max_connections` connections and applies any
    /// pending migrations. Returns an error if the connection fails or migrations cannot be
    /// applied.
    pub async fn new(postgres_db_url: &str, max_connections: u32) -> Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(postgres_db_url)
            .await
            .map_err(DbError::Connection)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database ready, pool of up to {max_connections} connections");

        let pool = Arc::new(pool);
        let market_series = Box::new(PgMarketSeriesRepo::new(pool.clone()));
        let trends = Box::new(PgTrendsRepo::new(pool.clone()));
        let users = Box::new(PgUsersRepo::new(pool));

        Ok(Arc::new(Self {
            market_series,
            trends,
            users,
        }))
    }

    #[cfg(test)]
    pub(crate) fn from_repositories(
        market_series: Box<dyn MarketSeriesRepository>,
        trends: Box<dyn TrendsRepository>,
        users: Box<dyn UsersRepository>,
    ) -> Arc<Self> {
        Arc::new(Self {
            market_series,
            trends,
            users,
        })
    }
}
