use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::db::models::{NewTrend, TrendCategory, TrendRow};

use super::super::{
    error::ApiError,
    session::{AdminUser, AuthUser},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    category: Option<String>,
}

pub async fn list_trends_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<TrendsParams>, QueryRejection>,
) -> Result<Json<Vec<TrendRow>>, ApiError> {
    let Query(params) = params?;
    let category = params
        .category
        .filter(|c| !c.is_empty())
        .map(|c| {
            c.parse::<TrendCategory>()
                .map_err(|_| ApiError::BadRequest("Invalid category"))
        })
        .transpose()?;

    let trends = state.db.trends.get_trends(category).await?;

    Ok(Json(trends))
}

pub async fn get_trend_handler(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    trend_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TrendRow>, ApiError> {
    let Path(trend_id) = trend_id?;

    state
        .db
        .trends
        .get_trend(trend_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Trend"))
}

#[derive(Debug, Deserialize)]
pub struct TrendPayload {
    name: Option<String>,
    image: Option<String>,
    category: Option<String>,
    description: Option<String>,
}

impl TryFrom<TrendPayload> for NewTrend {
    type Error = ApiError;

    fn try_from(payload: TrendPayload) -> Result<Self, Self::Error> {
        let name = payload
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(ApiError::BadRequest("Trend name is required"))?;
        let category: TrendCategory = payload
            .category
            .ok_or(ApiError::BadRequest("Invalid category"))?
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid category"))?;

        Ok(Self {
            name,
            image: payload.image.filter(|i| !i.is_empty()),
            category,
            description: payload.description,
        })
    }
}

pub async fn add_trend_handler(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TrendPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TrendRow>), ApiError> {
    let Json(payload) = payload?;
    let new_trend = NewTrend::try_from(payload)?;
    let trend = state.db.trends.add_trend(&new_trend).await?;

    info!(
        "Admin {} added trend {} ({})",
        admin.id, trend.trend_id, trend.category
    );

    Ok((StatusCode::CREATED, Json(trend)))
}

pub async fn delete_trend_handler(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    trend_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(trend_id) = trend_id?;

    if !state.db.trends.remove_trend(trend_id).await? {
        return Err(ApiError::NotFound("Trend"));
    }

    info!("Admin {} deleted trend {trend_id}", admin.id);

    Ok(StatusCode::NO_CONTENT)
}
