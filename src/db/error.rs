use std::result;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),

    #[error("Query error: {0}")]
    Query(sqlx::Error),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Unexpected query result: {0}")]
    UnexpectedQueryResult(String),
}

impl DbError {
    /// Maps unique constraint violations to [`DbError::UniqueViolation`], anything else to
    /// [`DbError::Query`].
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(db_err.message().to_string())
            }
            _ => Self::Query(err),
        }
    }
}

pub type Result<T> = result::Result<T, DbError>;
