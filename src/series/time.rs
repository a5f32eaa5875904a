use chrono::NaiveDateTime;

/// Fixed date the free-text `Time` values are anchored to before parsing.
pub const REFERENCE_DATE: &str = "2026-01-27";

/// Text format of a `Time` column.
///
/// Times are stored as free text, so chronological order has to be recovered by parsing them
/// against [`REFERENCE_DATE`]. The format must match the one the values were written with,
/// otherwise rows silently misorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `2:30:00 PM`
    TwelveHourSeconds,
    /// `14:30`
    TwentyFourHourMinutes,
}

impl TimeFormat {
    const fn chrono_format(&self) -> &'static str {
        match self {
            Self::TwelveHourSeconds => "%Y-%m-%d %I:%M:%S %p",
            Self::TwentyFourHourMinutes => "%Y-%m-%d %H:%M",
        }
    }

    const fn pg_format(&self) -> &'static str {
        match self {
            Self::TwelveHourSeconds => "YYYY-MM-DD HH12:MI:SS AM",
            Self::TwentyFourHourMinutes => "YYYY-MM-DD HH24:MI",
        }
    }

    // `to_timestamp` raises on malformed input, so values are matched first and anything else
    // becomes NULL.
    const fn pg_pattern(&self) -> &'static str {
        match self {
            Self::TwelveHourSeconds => "^(0?[1-9]|1[0-2]):[0-5][0-9]:[0-5][0-9] [AP]M$",
            Self::TwentyFourHourMinutes => "^([01]?[0-9]|2[0-3]):[0-5][0-9]$",
        }
    }

    /// Parses `time` anchored at [`REFERENCE_DATE`]. Returns `None` if it doesn't match the
    /// format.
    pub fn parse(&self, time: &str) -> Option<NaiveDateTime> {
        let anchored = format!("{REFERENCE_DATE} {}", time.trim());
        NaiveDateTime::parse_from_str(&anchored, self.chrono_format()).ok()
    }

    /// SQL ordering expression over `column`, ascending, unparseable values first. Values are
    /// trimmed before matching, as in [`TimeFormat::parse`].
    pub fn order_expr(&self, column: &str) -> String {
        format!(
            "CASE WHEN btrim(\"{column}\") ~ '{pattern}' \
             THEN to_timestamp('{REFERENCE_DATE} ' || btrim(\"{column}\"), '{format}') \
             END ASC NULLS FIRST",
            pattern = self.pg_pattern(),
            format = self.pg_format(),
        )
    }

    /// Stable in-place sort by parsed time. Unparseable times go first, keeping their relative
    /// order, which matches [`TimeFormat::order_expr`].
    pub fn sort_chronologically<T, F>(&self, rows: &mut [T], time_of: F)
    where
        F: Fn(&T) -> &str,
    {
        rows.sort_by_cached_key(|row| self.parse(time_of(row)));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 27)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn parses_twelve_hour_with_seconds() {
        let format = TimeFormat::TwelveHourSeconds;

        assert_eq!(format.parse("2:30:00 PM"), Some(at(14, 30, 0)));
        assert_eq!(format.parse("09:15:45 AM"), Some(at(9, 15, 45)));
        assert_eq!(format.parse("12:00:00 AM"), Some(at(0, 0, 0)));
        assert_eq!(format.parse("12:00:00 PM"), Some(at(12, 0, 0)));
        assert_eq!(format.parse(" 1:05:09 PM "), Some(at(13, 5, 9)));
    }

    #[test]
    fn rejects_malformed_twelve_hour() {
        let format = TimeFormat::TwelveHourSeconds;

        assert_eq!(format.parse(""), None);
        assert_eq!(format.parse("14:30"), None);
        assert_eq!(format.parse("2:30 PM"), None);
        assert_eq!(format.parse("13:00:00 PM"), None);
        assert_eq!(format.parse("N/A"), None);
    }

    #[test]
    fn parses_twenty_four_hour_minutes() {
        let format = TimeFormat::TwentyFourHourMinutes;

        assert_eq!(format.parse("1:00"), Some(at(1, 0, 0)));
        assert_eq!(format.parse("13:05"), Some(at(13, 5, 0)));
        assert_eq!(format.parse("00:00"), Some(at(0, 0, 0)));
        assert_eq!(format.parse("23:59"), Some(at(23, 59, 0)));
    }

    #[test]
    fn rejects_malformed_twenty_four_hour() {
        let format = TimeFormat::TwentyFourHourMinutes;

        assert_eq!(format.parse("24:00"), None);
        assert_eq!(format.parse("1:00:00 PM"), None);
        assert_eq!(format.parse("noon"), None);
    }

    #[test]
    fn sorts_twelve_hour_across_meridiem() {
        let mut times = vec!["1:00:00 PM", "11:59:59 AM", "12:30:00 PM", "9:00:00 AM"];

        TimeFormat::TwelveHourSeconds.sort_chronologically(&mut times, |t| *t);

        assert_eq!(
            times,
            vec!["9:00:00 AM", "11:59:59 AM", "12:30:00 PM", "1:00:00 PM"]
        );
    }

    #[test]
    fn sorts_twenty_four_hour_numerically_not_lexically() {
        let mut times = vec!["10:00", "9:30", "1:02", "1:00", "23:00"];

        TimeFormat::TwentyFourHourMinutes.sort_chronologically(&mut times, |t| *t);

        assert_eq!(times, vec!["1:00", "1:02", "9:30", "10:00", "23:00"]);
    }

    #[test]
    fn unparseable_times_sort_first_in_original_order() {
        let mut times = vec!["2:00", "bad", "1:00", "", "later"];

        TimeFormat::TwentyFourHourMinutes.sort_chronologically(&mut times, |t| *t);

        assert_eq!(times, vec!["bad", "", "later", "1:00", "2:00"]);
    }

    #[test]
    fn order_expr_guards_and_anchors_column() {
        let expr = TimeFormat::TwelveHourSeconds.order_expr("Time");

        assert!(expr.starts_with("CASE WHEN btrim(\"Time\") ~ '^"));
        assert!(expr.contains(
            "to_timestamp('2026-01-27 ' || btrim(\"Time\"), 'YYYY-MM-DD HH12:MI:SS AM')"
        ));
        assert!(expr.ends_with("END ASC NULLS FIRST"));

        let expr = TimeFormat::TwentyFourHourMinutes.order_expr("Time");
        assert!(expr.contains("'YYYY-MM-DD HH24:MI'"));
    }

    #[test]
    fn padded_times_are_matched_after_trimming_in_sql_and_rust() {
        let format = TimeFormat::TwelveHourSeconds;
        let expr = format.order_expr("Time");

        // Every reference to the column in the ordering expression is trimmed.
        assert_eq!(expr.matches("\"Time\"").count(), 2);
        assert_eq!(expr.matches("btrim(\"Time\")").count(), 2);
        assert!(format.parse(" 1:05:09 PM ").is_some());

        let mut times = vec![" 1:05:09 PM ", "9:00:00 AM", "garbage"];
        format.sort_chronologically(&mut times, |t| *t);
        assert_eq!(times, vec!["garbage", "9:00:00 AM", " 1:05:09 PM "]);
    }
}
