use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, postgres::PgRow};

use crate::series::{
    self, MarketTable, MultiSeriesRow, RawValue, SeriesRow, SeriesSelection, ValueType,
};

use super::super::{
    error::{DbError, Result},
    repositories::MarketSeriesRepository,
};

pub(crate) struct PgMarketSeriesRepo {
    pool: Arc<Pool<Postgres>>,
}

impl PgMarketSeriesRepo {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &Pool<Postgres> {
        self.pool.as_ref()
    }
}

fn decode_value(row: &PgRow, column: &str, value_type: ValueType) -> Result<RawValue> {
    let value = match value_type {
        ValueType::Numeric => row.try_get::<Option<f64>, _>(column).map(RawValue::from),
        ValueType::Text => row.try_get::<Option<String>, _>(column).map(RawValue::from),
    };

    value.map_err(|e| {
        DbError::UnexpectedQueryResult(format!("column `{column}` could not be decoded: {e}"))
    })
}

fn decode_time(row: &PgRow) -> Result<String> {
    row.try_get("time").map_err(|e| {
        DbError::UnexpectedQueryResult(format!("column `Time` could not be decoded: {e}"))
    })
}

#[async_trait]
impl MarketSeriesRepository for PgMarketSeriesRepo {
    async fn get_series(&self, selection: SeriesSelection) -> Result<Vec<SeriesRow>> {
        let query = series::single_series_query(selection);
        let value_type = selection.table().value_type();

        let rows = sqlx::query(&query)
            .fetch_all(self.pool())
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(|row| {
                Ok(SeriesRow {
                    time: decode_time(row)?,
                    value: decode_value(row, "value", value_type)?,
                })
            })
            .collect()
    }

    async fn get_multi_series(&self, table: MarketTable) -> Result<Vec<MultiSeriesRow<RawValue>>> {
        let query = series::multi_series_query(table);
        let columns = table.columns();
        let value_type = table.value_type();

        let rows = sqlx::query(&query)
            .fetch_all(self.pool())
            .await
            .map_err(DbError::Query)?;

        let mut multi_rows = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let mut values = Vec::with_capacity(columns.len());
            for &column in columns.iter() {
                values.push((column, decode_value(row, column, value_type)?));
            }

            multi_rows.push(MultiSeriesRow {
                time: decode_time(row)?,
                values,
            });
        }

        Ok(multi_rows)
    }
}
