pub(super) mod market_series;
pub(super) mod trends;
pub(super) mod users;
