use std::result;

use thiserror::Error;

use super::MarketTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Invalid {} name", .market.asset_label())]
    InvalidSeriesName { market: MarketTable, name: String },
}

pub type Result<T> = result::Result<T, SeriesError>;
