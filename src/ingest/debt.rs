//! Debt-to-GDP normalizer for the quarterly ECB GFS feed.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::Series;

use super::resolve::ColumnStrategy;
use super::table::Table;

/// Known labels are preferred; when the feed ships without them, fall back
/// to sniffing the columns from sampled values.
const STRATEGIES: [ColumnStrategy; 2] = [
    ColumnStrategy::ExactLabel {
        period: "TIME_PERIOD",
        value: "OBS_VALUE",
    },
    ColumnStrategy::PatternSniff,
];

/// Parse the quarterly debt-to-GDP payload into a series keyed by
/// quarter-end date.
///
/// Returns an empty series when the table is empty or the period/value
/// columns cannot be resolved; rows with malformed period labels or
/// non-numeric values are dropped.
pub fn parse_debt_gdp(text: &str) -> Series {
    let Some(table) = Table::read_lenient(text) else {
        return Series::empty();
    };
    let Some(cols) = STRATEGIES.iter().find_map(|s| s.resolve(&table)) else {
        debug!("debt/GDP: no usable period/value columns");
        return Series::empty();
    };

    Series::new(table.rows.iter().filter_map(|row| {
        let date = quarter_end(row.get(cols.period)?)?;
        let value = row.get(cols.value)?.parse::<f64>().ok()?;
        Some((date, value))
    }))
}

/// `YYYY-Qn` maps to the last calendar day of the quarter:
/// Q1 -> Mar 31, Q2 -> Jun 30, Q3 -> Sep 30, Q4 -> Dec 31.
fn quarter_end(label: &str) -> Option<NaiveDate> {
    let (year, quarter) = label.trim().split_once("-Q")?;
    let year: i32 = year.parse().ok()?;
    let quarter: u32 = quarter.parse().ok()?;
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let month = quarter * 3;
    let day = if month == 3 || month == 12 { 31 } else { 30 };
    NaiveDate::from_ymd_opt(year, month, day)
}
