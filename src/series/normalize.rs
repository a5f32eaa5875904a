use super::{MultiSeriesRow, PricePoint, RawValue, SeriesRow};

/// Removes every `$`, `,` and whitespace character.
pub fn clean_currency(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parses the longest numeric prefix of `input`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fractional part and an optional exponent.
/// Trailing garbage is ignored (`"12abc"` is `12`), but at least one digit must be present.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

// Non-finite results and negative zero collapse to `0`.
fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => 0.0,
    }
}

fn coerce_or_zero(value: &RawValue) -> f64 {
    match value {
        RawValue::Null => 0.0,
        RawValue::Number(n) => or_zero(Some(*n)),
        RawValue::Text(s) => or_zero(parse_float(s)),
    }
}

fn clean_or_zero(value: &RawValue) -> f64 {
    match value {
        RawValue::Text(s) => or_zero(parse_float(&clean_currency(s))),
        other => coerce_or_zero(other),
    }
}

/// Stock rows are never dropped. Values that fail numeric coercion become `0`.
pub(crate) fn normalize_stock_rows(
    rows: impl IntoIterator<Item = SeriesRow>,
) -> impl Iterator<Item = PricePoint> {
    rows.into_iter().map(|row| PricePoint {
        value: coerce_or_zero(&row.value),
        date: row.time,
    })
}

/// Rows with a null value are dropped. Remaining text values are stripped of currency
/// formatting before parsing, and values that still fail to parse become `0`.
pub(crate) fn normalize_crypto_rows(
    rows: impl IntoIterator<Item = SeriesRow>,
) -> impl Iterator<Item = PricePoint> {
    rows.into_iter()
        .filter(|row| row.value != RawValue::Null)
        .map(|row| PricePoint {
            value: clean_or_zero(&row.value),
            date: row.time,
        })
}

/// Cleans every column of each row independently. `Time` is kept verbatim.
pub(crate) fn clean_multi_series_rows(
    rows: impl IntoIterator<Item = MultiSeriesRow<RawValue>>,
) -> impl Iterator<Item = MultiSeriesRow<f64>> {
    rows.into_iter().map(|row| MultiSeriesRow {
        time: row.time,
        values: row
            .values
            .iter()
            .map(|(column, value)| (*column, clean_or_zero(value)))
            .collect(),
    })
}
