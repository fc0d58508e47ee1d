//! Column resolution strategies for tabular payloads.
//!
//! Which columns hold the period label and the observation value is decided
//! once per parse. Both ways of deciding — matching known header labels and
//! sniffing sampled cell values — live here so the coupling to upstream
//! column naming stays in one place and each strategy is testable on its own.

use std::sync::OnceLock;

use regex::Regex;

use super::table::Table;

/// Resolved (period, value) column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub period: usize,
    pub value: usize,
}

#[derive(Debug, Clone, Copy)]
pub enum ColumnStrategy {
    /// Case-insensitive substring match on header labels.
    ExactLabel {
        period: &'static str,
        value: &'static str,
    },
    /// Sniff the period column from sampled cell values (quarter labels
    /// first, any 4-digit year as fallback), then take the first later
    /// column that is numeric often enough.
    PatternSniff,
}

/// How many leading non-missing cells are sampled per column.
const SAMPLE_LEN: usize = 10;
/// A value column must coerce to numeric strictly more often than this.
const MIN_NUMERIC_VALUES: usize = 5;

impl ColumnStrategy {
    pub fn resolve(self, table: &Table) -> Option<ColumnSelection> {
        match self {
            ColumnStrategy::ExactLabel { period, value } => resolve_exact(table, period, value),
            ColumnStrategy::PatternSniff => resolve_sniff(table),
        }
    }
}

fn resolve_exact(table: &Table, period_token: &str, value_token: &str) -> Option<ColumnSelection> {
    let mut period = None;
    let mut value = None;
    for (idx, header) in table.headers.iter().enumerate() {
        let upper = header.to_uppercase();
        if upper.contains(period_token) {
            period.get_or_insert(idx);
        } else if upper.contains(value_token) {
            value.get_or_insert(idx);
        }
    }
    Some(ColumnSelection {
        period: period?,
        value: value?,
    })
}

fn resolve_sniff(table: &Table) -> Option<ColumnSelection> {
    let period = sniff_period_column(table, quarter_pattern())
        .or_else(|| sniff_period_column(table, year_pattern()))?;
    let value = sniff_value_column(table, period)?;
    Some(ColumnSelection { period, value })
}

fn sniff_period_column(table: &Table, pattern: &Regex) -> Option<usize> {
    (0..table.headers.len()).find(|&idx| {
        table
            .column(idx)
            .filter(|cell| !cell.is_empty())
            .take(SAMPLE_LEN)
            .any(|cell| pattern.is_match(cell))
    })
}

fn sniff_value_column(table: &Table, period: usize) -> Option<usize> {
    (period + 1..table.headers.len()).find(|&idx| {
        table
            .column(idx)
            .filter(|cell| cell.parse::<f64>().is_ok())
            .count()
            > MIN_NUMERIC_VALUES
    })
}

fn quarter_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-Q[1-4]").expect("static pattern"))
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").expect("static pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::read_lenient(text).unwrap()
    }

    #[test]
    fn exact_label_matches_case_insensitively() {
        let t = table("key,time_period,obs_value\nx,2020-Q1,80.1\n");
        let cols = ColumnStrategy::ExactLabel {
            period: "TIME_PERIOD",
            value: "OBS_VALUE",
        }
        .resolve(&t)
        .unwrap();
        assert_eq!(cols, ColumnSelection { period: 1, value: 2 });
    }

    #[test]
    fn exact_label_fails_when_either_column_is_missing() {
        let t = table("key,time_period,other\nx,2020-Q1,80.1\n");
        let cols = ColumnStrategy::ExactLabel {
            period: "TIME_PERIOD",
            value: "OBS_VALUE",
        }
        .resolve(&t);
        assert!(cols.is_none());
    }

    #[test]
    fn sniff_finds_quarter_column_and_numeric_value_column() {
        let mut text = String::from("a,b,c\n");
        for i in 0..8 {
            text.push_str(&format!("meta,202{}-Q1,{}.5\n", i % 4, 70 + i));
        }
        let t = table(&text);
        let cols = ColumnStrategy::PatternSniff.resolve(&t).unwrap();
        assert_eq!(cols, ColumnSelection { period: 1, value: 2 });
    }

    #[test]
    fn sniff_falls_back_to_year_pattern() {
        let mut text = String::from("a,b\n");
        for i in 0..8 {
            text.push_str(&format!("20{:02},{}.0\n", 10 + i, 50 + i));
        }
        let t = table(&text);
        let cols = ColumnStrategy::PatternSniff.resolve(&t).unwrap();
        assert_eq!(cols, ColumnSelection { period: 0, value: 1 });
    }

    #[test]
    fn sniff_requires_enough_numeric_values() {
        // Only three numeric rows: below the acceptance threshold.
        let t = table("a,b\n2020-Q1,1.0\n2020-Q2,2.0\n2020-Q3,3.0\n");
        assert!(ColumnStrategy::PatternSniff.resolve(&t).is_none());
    }
}
