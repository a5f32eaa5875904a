use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer, ser::SerializeMap};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

pub mod error;
mod normalize;
pub(crate) mod pipeline;
mod query;
mod time;

use error::{Result, SeriesError};

pub use normalize::{clean_currency, parse_float};
pub(crate) use normalize::{clean_multi_series_rows, normalize_crypto_rows, normalize_stock_rows};
pub(crate) use query::{multi_series_query, single_series_query};
pub use time::{REFERENCE_DATE, TimeFormat};

/// Wide price tables. Each row is a time slot and each instrument has its own column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketTable {
    Stock,
    CryptoPrices,
}

/// Storage type of the instrument columns of a [`MarketTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Clean `DOUBLE PRECISION` columns.
    Numeric,
    /// Free text columns, possibly currency formatted (`"$1,234.56"`).
    Text,
}

impl MarketTable {
    pub const fn table_name(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::CryptoPrices => "crypto_prices",
        }
    }

    /// Label used in user facing error messages.
    pub const fn asset_label(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::CryptoPrices => "crypto",
        }
    }

    /// Format the `Time` column values were written with.
    pub const fn time_format(&self) -> TimeFormat {
        match self {
            Self::Stock => TimeFormat::TwelveHourSeconds,
            Self::CryptoPrices => TimeFormat::TwentyFourHourMinutes,
        }
    }

    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Stock => ValueType::Numeric,
            Self::CryptoPrices => ValueType::Text,
        }
    }

    /// Instrument columns, in display order.
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            Self::Stock => StockSeries::iter().map(StockSeries::column).collect(),
            Self::CryptoPrices => CryptoSeries::iter().map(CryptoSeries::column).collect(),
        }
    }
}

impl fmt::Display for MarketTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// A named instrument whose values live in one column of a [`MarketTable`].
///
/// Implementors form a closed allow-list. The column name is interpolated into SQL as an
/// identifier, so a value of a `Series` type must only ever be obtained through
/// [`Series::validate`] or from the enum variants themselves.
pub trait Series: Copy + fmt::Debug + Send + Sync + FromStr + Into<&'static str> + 'static {
    const TABLE: MarketTable;
    const DEFAULT: Self;

    /// Returns the series matching `name` exactly, or [`SeriesError::InvalidSeriesName`].
    fn validate(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| SeriesError::InvalidSeriesName {
            market: Self::TABLE,
            name: name.to_string(),
        })
    }

    fn column(self) -> &'static str {
        self.into()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum StockSeries {
    Nvidia,
    Tesla,
    Apple,
    #[strum(serialize = "DBS")]
    Dbs,
    Grab,
}

impl Series for StockSeries {
    const TABLE: MarketTable = MarketTable::Stock;
    const DEFAULT: Self = Self::Nvidia;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum CryptoSeries {
    Bitcoin,
    Ethereum,
    Solana,
    Ripple,
    Cardano,
}

impl Series for CryptoSeries {
    const TABLE: MarketTable = MarketTable::CryptoPrices;
    const DEFAULT: Self = Self::Bitcoin;
}

/// A validated `(table, column)` pair. Can only be built from a [`Series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSelection {
    table: MarketTable,
    column: &'static str,
}

impl SeriesSelection {
    pub fn of<S: Series>(series: S) -> Self {
        Self {
            table: S::TABLE,
            column: series.column(),
        }
    }

    pub fn table(&self) -> MarketTable {
        self.table
    }

    pub fn column(&self) -> &'static str {
        self.column
    }
}

/// Raw cell value as stored. Serializes as a JSON number, string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }
}

impl From<Option<String>> for RawValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

/// A single-series row as returned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub time: String,
    pub value: RawValue,
}

/// Normalized chart point. `value` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: String,
    pub value: f64,
}

/// A row carrying every instrument column of a table.
///
/// Serializes as a flat object: `{"Time": ..., "<column>": <value>, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeriesRow<V> {
    pub time: String,
    pub values: Vec<(&'static str, V)>,
}

impl<V> MultiSeriesRow<V> {
    pub fn get(&self, column: &str) -> Option<&V> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

impl<V: Serialize> Serialize for MultiSeriesRow<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("Time", &self.time)?;
        for (column, value) in &self.values {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
