#![doc = include_str!("../README.md")]

mod config;
mod db;
/// Exports [`StockSeries`], [`CryptoSeries`] and the normalization helpers behind the chart
/// endpoints.
///
/// [`StockSeries`]: crate::series::StockSeries
/// [`CryptoSeries`]: crate::series::CryptoSeries
pub mod series;
mod server;

pub use config::Config;
pub use db::Database;
pub use server::{build_router, start_server, state::AppState};

/// Error types returned by `clearhorizon`.
pub mod error {
    pub use super::config::ConfigError;
    pub use super::db::error::DbError;
    pub use super::series::error::SeriesError;
    pub use super::server::error::{ApiError, ServerError};

    /// Convenience general-purpose Result type alias.
    pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
}

/// Exports database models and session types.
pub mod models {
    pub use super::db::models::{
        NewTrend, NewUser, TrendCategory, TrendRow, UserRole, UserRow, UserUpdate,
    };
    pub use super::server::session::{SessionStore, SessionUser};
}
