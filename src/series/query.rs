use super::{MarketTable, SeriesSelection};

const TIME_COLUMN: &str = "Time";

/// Builds the query for a single series: `time` and `value` columns ordered by time of day.
///
/// The column identifier is interpolated into the statement, which is only sound because a
/// [`SeriesSelection`] can only be built from an allow-listed series.
pub(crate) fn single_series_query(selection: SeriesSelection) -> String {
    let table = selection.table();

    format!(
        "SELECT \"{TIME_COLUMN}\" AS time, \"{column}\" AS value FROM {table_name} ORDER BY {order}",
        column = selection.column(),
        table_name = table.table_name(),
        order = table.time_format().order_expr(TIME_COLUMN),
    )
}

/// Builds the query selecting `Time` and every instrument column of `table`.
pub(crate) fn multi_series_query(table: MarketTable) -> String {
    let columns = table
        .columns()
        .iter()
        .map(|column| format!("\"{column}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT \"{TIME_COLUMN}\" AS time, {columns} FROM {table_name} ORDER BY {order}",
        table_name = table.table_name(),
        order = table.time_format().order_expr(TIME_COLUMN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{CryptoSeries, StockSeries};

    #[test]
    fn stock_series_query() {
        let query = single_series_query(SeriesSelection::of(StockSeries::Dbs));

        assert!(query.starts_with("SELECT \"Time\" AS time, \"DBS\" AS value FROM stock ORDER BY "));
        assert!(query.contains("'YYYY-MM-DD HH12:MI:SS AM'"));
        assert!(query.ends_with("ASC NULLS FIRST"));
    }

    #[test]
    fn crypto_series_query() {
        let query = single_series_query(SeriesSelection::of(CryptoSeries::Solana));

        assert!(query.starts_with(
            "SELECT \"Time\" AS time, \"Solana\" AS value FROM crypto_prices ORDER BY "
        ));
        assert!(query.contains("'YYYY-MM-DD HH24:MI'"));
    }

    #[test]
    fn multi_series_queries_select_every_column() {
        let query = multi_series_query(MarketTable::Stock);
        assert!(query.starts_with(
            "SELECT \"Time\" AS time, \"Nvidia\", \"Tesla\", \"Apple\", \"DBS\", \"Grab\" FROM stock ORDER BY "
        ));

        let query = multi_series_query(MarketTable::CryptoPrices);
        assert!(query.starts_with(
            "SELECT \"Time\" AS time, \"Bitcoin\", \"Ethereum\", \"Solana\", \"Ripple\", \"Cardano\" \
             FROM crypto_prices ORDER BY "
        ));
    }
}
