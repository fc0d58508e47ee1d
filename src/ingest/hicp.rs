//! HICP normalizer for the monthly ECB ICP feed.
//!
//! Unlike the debt feed, this one has always shipped the standard labels, so
//! resolution is exact-label only — no sniffing fallback.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::Series;

use super::resolve::ColumnStrategy;
use super::table::Table;

const STRATEGY: ColumnStrategy = ColumnStrategy::ExactLabel {
    period: "TIME_PERIOD",
    value: "OBS_VALUE",
};

/// Parse the monthly HICP payload into a series keyed by the first day of
/// each month. Empty series on missing columns or empty input.
pub fn parse_hicp(text: &str) -> Series {
    let Some(table) = Table::read_lenient(text) else {
        return Series::empty();
    };
    let Some(cols) = STRATEGY.resolve(&table) else {
        debug!("HICP: TIME_PERIOD/OBS_VALUE columns not found");
        return Series::empty();
    };

    Series::new(table.rows.iter().filter_map(|row| {
        let date = month_start(row.get(cols.period)?)?;
        let value = row.get(cols.value)?.parse::<f64>().ok()?;
        Some((date, value))
    }))
}

/// Strict `YYYY-MM` (7 characters) only; anything else is dropped.
fn month_start(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    if label.len() != 7 {
        return None;
    }
    let (year, month) = label.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_labels_map_to_first_of_month() {
        assert_eq!(month_start("2023-01"), Some(d(2023, 1, 1)));
        assert_eq!(month_start("2023-12"), Some(d(2023, 12, 1)));
    }

    #[test]
    fn non_monthly_shapes_are_rejected() {
        assert_eq!(month_start("2023-1"), None);
        assert_eq!(month_start("2023-013"), None);
        assert_eq!(month_start("2023-13"), None);
        assert_eq!(month_start("2023-Q1"), None);
        assert_eq!(month_start("2023"), None);
    }

    #[test]
    fn parses_labeled_payload() {
        let text = "KEY,TIME_PERIOD,OBS_VALUE\n\
                    ICP.M.HU,2023-01,25.7\n\
                    ICP.M.HU,2023-02,25.4\n\
                    ICP.M.HU,2023-Q1,9.9\n";
        let series = parse_hicp(text);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d(2023, 2, 1)), Some(25.4));
    }

    #[test]
    fn missing_labels_yield_empty_series() {
        // No sniffing fallback for this feed.
        let text = "a,b\n2023-01,25.7\n2023-02,25.4\n";
        assert!(parse_hicp(text).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(parse_hicp("").is_empty());
    }
}
