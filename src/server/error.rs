use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{db::error::DbError, series::error::SeriesError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database initialization failed: {0}")]
    Database(#[from] DbError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Errors returned by request handlers. Rendered as `{"error": "<message>"}`.
///
/// Extractor rejections are wrapped too, so malformed requests get the same JSON body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    InvalidSeries(#[from] SeriesError),

    #[error(transparent)]
    InvalidJson(#[from] JsonRejection),

    #[error(transparent)]
    InvalidPath(#[from] PathRejection),

    #[error(transparent)]
    InvalidQuery(#[from] QueryRejection),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Please log in to view this page")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already exists. Please use a different email.")]
    EmailTaken,

    #[error("{0}")]
    Database(DbError),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(_) => Self::EmailTaken,
            err => Self::Database(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSeries(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidJson(rejection) => rejection.status(),
            Self::InvalidPath(rejection) => rejection.status(),
            Self::InvalidQuery(rejection) => rejection.status(),
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
