use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::super::{
    error::{DbError, Result},
    models::{NewTrend, TrendCategory, TrendRow},
    repositories::TrendsRepository,
};

const TREND_COLUMNS: &str = "trend_id, trend_name, image, category, description";

// `category` is stored as text and validated on the way out.
#[derive(FromRow)]
struct TrendRecord {
    trend_id: i32,
    trend_name: String,
    image: Option<String>,
    category: String,
    description: Option<String>,
}

impl TryFrom<TrendRecord> for TrendRow {
    type Error = DbError;

    fn try_from(record: TrendRecord) -> Result<Self> {
        let category = record.category.parse::<TrendCategory>().map_err(|_| {
            DbError::UnexpectedQueryResult(format!(
                "`category` ({}) of trend {} is not a known category",
                record.category, record.trend_id
            ))
        })?;

        Ok(Self {
            trend_id: record.trend_id,
            trend_name: record.trend_name,
            image: record.image,
            category,
            description: record.description,
        })
    }
}

pub(crate) struct PgTrendsRepo {
    pool: Arc<Pool<Postgres>>,
}

impl PgTrendsRepo {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &Pool<Postgres> {
        self.pool.as_ref()
    }
}

#[async_trait]
impl TrendsRepository for PgTrendsRepo {
    async fn get_trends(&self, category: Option<TrendCategory>) -> Result<Vec<TrendRow>> {
        let records = match category {
            Some(category) => {
                sqlx::query_as::<_, TrendRecord>(&format!(
                    "SELECT {TREND_COLUMNS} FROM trends WHERE category = $1 ORDER BY trend_id ASC"
                ))
                .bind(category.as_ref())
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, TrendRecord>(&format!(
                    "SELECT {TREND_COLUMNS} FROM trends ORDER BY trend_id ASC"
                ))
                .fetch_all(self.pool())
                .await
            }
        }
        .map_err(DbError::Query)?;

        records.into_iter().map(TrendRow::try_from).collect()
    }

    async fn get_trend(&self, trend_id: i32) -> Result<Option<TrendRow>> {
        sqlx::query_as::<_, TrendRecord>(&format!(
            "SELECT {TREND_COLUMNS} FROM trends WHERE trend_id = $1"
        ))
        .bind(trend_id)
        .fetch_optional(self.pool())
        .await
        .map_err(DbError::Query)?
        .map(TrendRow::try_from)
        .transpose()
    }

    async fn add_trend(&self, trend: &NewTrend) -> Result<TrendRow> {
        let record = sqlx::query_as::<_, TrendRecord>(&format!(
            "INSERT INTO trends (trend_name, image, category, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {TREND_COLUMNS}"
        ))
        .bind(&trend.name)
        .bind(&trend.image)
        .bind(trend.category.as_ref())
        .bind(&trend.description)
        .fetch_one(self.pool())
        .await
        .map_err(DbError::from_write)?;

        TrendRow::try_from(record)
    }

    async fn remove_trend(&self, trend_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trends WHERE trend_id = $1")
            .bind(trend_id)
            .execute(self.pool())
            .await
            .map_err(DbError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
