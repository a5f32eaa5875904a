use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::{
    CryptoSeries, MultiSeriesRow, PricePoint, RawValue, Series, StockSeries, error::SeriesError,
    pipeline,
};

use super::super::{error::ApiError, session::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StockParams {
    stock: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CryptoParams {
    crypto: Option<String>,
}

/// Stock chart payload entry. The stock endpoint exposes the value under `stock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockChartPoint {
    pub date: String,
    pub stock: f64,
}

impl From<PricePoint> for StockChartPoint {
    fn from(point: PricePoint) -> Self {
        Self {
            date: point.date,
            stock: point.value,
        }
    }
}

// Missing and empty parameters both select the default series.
fn requested<S: Series>(param: Option<&str>) -> Result<S, ApiError> {
    let name = param
        .filter(|name| !name.is_empty())
        .unwrap_or(S::DEFAULT.column());

    S::validate(name).map_err(ApiError::from)
}

// A query string that doesn't deserialize (e.g. a repeated parameter) can't name one series.
fn unusable_query<S: Series>(rejection: QueryRejection) -> ApiError {
    let reason = rejection.body_text();
    debug!("Unusable {} chart query: {reason}", S::TABLE.asset_label());

    SeriesError::InvalidSeriesName {
        market: S::TABLE,
        name: reason,
    }
    .into()
}

pub async fn chart_data_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<StockParams>, QueryRejection>,
) -> Result<Json<Vec<StockChartPoint>>, ApiError> {
    let Query(params) = params.map_err(unusable_query::<StockSeries>)?;
    debug!("Chart data requested for stock {:?}", params.stock);

    let series: StockSeries = requested(params.stock.as_deref())?;
    let points = pipeline::stock_points(state.db.market_series.as_ref(), series).await?;

    debug!("Sending {} points for {series}", points.len());

    Ok(Json(points.into_iter().map(StockChartPoint::from).collect()))
}

pub async fn crypto_data_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<CryptoParams>, QueryRejection>,
) -> Result<Json<Vec<PricePoint>>, ApiError> {
    let Query(params) = params.map_err(unusable_query::<CryptoSeries>)?;
    debug!("Chart data requested for crypto {:?}", params.crypto);

    let series: CryptoSeries = requested(params.crypto.as_deref())?;
    let points = pipeline::crypto_points(state.db.market_series.as_ref(), series).await?;

    debug!("Sending {} points for {series}", points.len());

    Ok(Json(points))
}

pub async fn multiline_stock_data_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MultiSeriesRow<RawValue>>>, ApiError> {
    let rows = pipeline::stock_multi_rows(state.db.market_series.as_ref()).await?;

    debug!("Sending {} multiline stock rows", rows.len());

    Ok(Json(rows))
}

pub async fn multiline_crypto_data_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MultiSeriesRow<f64>>>, ApiError> {
    let rows = pipeline::crypto_multi_points(state.db.market_series.as_ref()).await?;

    debug!("Sending {} multiline crypto rows", rows.len());

    Ok(Json(rows))
}
