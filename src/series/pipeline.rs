//! Fetch, order and normalize steps shared by the chart endpoints.
//!
//! Rows are re-sorted with [`TimeFormat::sort_chronologically`] after every fetch so the output
//! order doesn't depend on how a repository implements the ordering.
//!
//! [`TimeFormat::sort_chronologically`]: super::TimeFormat::sort_chronologically

use crate::db::{error::Result, repositories::MarketSeriesRepository};

use super::{
    CryptoSeries, MarketTable, MultiSeriesRow, PricePoint, RawValue, Series, SeriesRow,
    SeriesSelection, StockSeries, clean_multi_series_rows, normalize_crypto_rows,
    normalize_stock_rows,
};

async fn ordered_series<S: Series>(
    repo: &dyn MarketSeriesRepository,
    series: S,
) -> Result<Vec<SeriesRow>> {
    let mut rows = repo.get_series(SeriesSelection::of(series)).await?;

    S::TABLE
        .time_format()
        .sort_chronologically(&mut rows, |row| row.time.as_str());

    Ok(rows)
}

async fn ordered_multi_series(
    repo: &dyn MarketSeriesRepository,
    table: MarketTable,
) -> Result<Vec<MultiSeriesRow<RawValue>>> {
    let mut rows = repo.get_multi_series(table).await?;

    table
        .time_format()
        .sort_chronologically(&mut rows, |row| row.time.as_str());

    Ok(rows)
}

pub(crate) async fn stock_points(
    repo: &dyn MarketSeriesRepository,
    series: StockSeries,
) -> Result<Vec<PricePoint>> {
    let rows = ordered_series(repo, series).await?;

    Ok(normalize_stock_rows(rows).collect())
}

pub(crate) async fn crypto_points(
    repo: &dyn MarketSeriesRepository,
    series: CryptoSeries,
) -> Result<Vec<PricePoint>> {
    let rows = ordered_series(repo, series).await?;

    Ok(normalize_crypto_rows(rows).collect())
}

/// Stock rows are returned as stored.
pub(crate) async fn stock_multi_rows(
    repo: &dyn MarketSeriesRepository,
) -> Result<Vec<MultiSeriesRow<RawValue>>> {
    ordered_multi_series(repo, MarketTable::Stock).await
}

pub(crate) async fn crypto_multi_points(
    repo: &dyn MarketSeriesRepository,
) -> Result<Vec<MultiSeriesRow<f64>>> {
    let rows = ordered_multi_series(repo, MarketTable::CryptoPrices).await?;

    Ok(clean_multi_series_rows(rows).collect())
}
