//! Consumer-price-index normalizer for the KSH stadat export.
//!
//! This is the least structured input of the three feeds: a
//! semicolon-delimited file where the true header row sits somewhere
//! mid-file, the year cell is only populated on the row where the year
//! changes (merged-cell export), month names are Hungarian, and numbers use
//! decimal commas with spaces as thousands separators.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::Series;

/// Year tokens that mark the first data row below the header.
const RECENT_YEARS: [&str; 6] = ["2020", "2021", "2022", "2023", "2024", "2025"];

/// Rows scanned below the header before giving up on finding data.
const DATA_SCAN_WINDOW: usize = 20;

/// Hungarian month names in calendar order.
const MONTHS: [&str; 12] = [
    "január",
    "február",
    "március",
    "április",
    "május",
    "június",
    "július",
    "augusztus",
    "szeptember",
    "október",
    "november",
    "december",
];

/// Parse the CPI export into an index-level series keyed by the first day of
/// each month. Empty series when the header or data rows cannot be located
/// or no value column is numeric.
pub fn parse_cpi(text: &str) -> Series {
    let lines: Vec<&str> = text.lines().collect();

    let Some(header_idx) = find_header(&lines) else {
        debug!("CPI: header row not found");
        return Series::empty();
    };
    let Some(data_idx) = find_data_start(&lines, header_idx) else {
        debug!("CPI: no data row within the scan window");
        return Series::empty();
    };

    let headers: Vec<&str> = lines[header_idx].split(';').map(str::trim).collect();
    let rows = collect_rows(&lines[data_idx..]);
    if rows.is_empty() {
        return Series::empty();
    }

    let Some(target) = select_value_column(&headers, &rows) else {
        debug!("CPI: no numeric value column");
        return Series::empty();
    };

    Series::new(rows.iter().filter_map(|row| {
        let value = parse_decimal(row.values.get(target)?)?;
        Some((row.date, value))
    }))
}

/// The header is the first line naming both the year column and the period
/// column. `Idõszak` is the Latin-1 rendering of `Időszak`; the feed has
/// shipped both spellings.
fn find_header(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.contains("Év") && (line.contains("Időszak") || line.contains("Idõszak")))
}

/// Data begins at the first row below the header whose first field carries a
/// recent year token.
fn find_data_start(lines: &[&str], header_idx: usize) -> Option<usize> {
    let end = lines.len().min(header_idx + DATA_SCAN_WINDOW);
    (header_idx + 1..end).find(|&idx| {
        let first = lines[idx].split(';').next().unwrap_or("").trim();
        !first.is_empty() && RECENT_YEARS.iter().any(|year| first.contains(year))
    })
}

/// One reconstructed data row: resolved date plus the raw value cells.
#[derive(Debug)]
struct CpiRow {
    date: NaiveDate,
    values: Vec<String>,
}

#[derive(Default)]
struct RowAccumulator {
    /// Year carried forward across rows; the export only writes the year on
    /// the row where it changes.
    current_year: Option<i32>,
    rows: Vec<CpiRow>,
}

fn collect_rows(lines: &[&str]) -> Vec<CpiRow> {
    let acc = lines
        .iter()
        .fold(RowAccumulator::default(), |mut acc, line| {
            let line = line.trim();
            if line.is_empty() {
                return acc;
            }
            let parts: Vec<&str> = line.split(';').map(str::trim).collect();
            if parts.len() < 2 {
                return acc;
            }

            if let Some(year) = parse_year(parts[0]) {
                acc.current_year = Some(year);
            }

            if let (Some(year), Some(month)) = (acc.current_year, month_number(parts[1])) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
                    acc.rows.push(CpiRow {
                        date,
                        values: parts[2..].iter().map(|cell| cell.to_string()).collect(),
                    });
                }
            }
            acc
        });
    acc.rows
}

/// A year cell is a 4-digit number, possibly with a trailing period (`2021.`).
fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim_end_matches('.');
    (cell.len() == 4 && cell.chars().all(|c| c.is_ascii_digit()))
        .then(|| cell.parse().ok())
        .flatten()
}

/// Map a Hungarian month name to its calendar number. Unrecognized names
/// yield `None` so the row is dropped rather than silently landing in
/// January.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|month| *month == name)
        .map(|idx| idx as u32 + 1)
}

/// Parse a locale-formatted number: decimal comma, embedded spaces as
/// thousands separators.
fn parse_decimal(cell: &str) -> Option<f64> {
    let normalized = cell.replace(' ', "").replace(',', ".");
    let value = normalized.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Prefer the aggregate column (the local word for "Total"); otherwise the
/// last column with any numeric content.
fn select_value_column(headers: &[&str], rows: &[CpiRow]) -> Option<usize> {
    let value_headers = headers.get(2..).unwrap_or(&[]);
    if let Some(idx) = value_headers
        .iter()
        .position(|header| header.to_lowercase().contains("összesen"))
    {
        return Some(idx);
    }

    let width = rows.iter().map(|row| row.values.len()).max().unwrap_or(0);
    (0..width).rev().find(|&idx| {
        rows.iter()
            .any(|row| row.values.get(idx).and_then(|cell| parse_decimal(cell)).is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_mid_file_header_with_year_carry_forward() {
        // Header at line index 5, data from index 7.
        let text = "A fogyasztói árak alakulása\n\
                    \n\
                    STADAT\n\
                    ;;\n\
                    \n\
                    Év;Időszak;Összesen\n\
                    ;;elõzõ év azonos idõszaka=100,0\n\
                    2021.;január;103,2\n\
                    ;február;103,8\n";
        let series = parse_cpi(text);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d(2021, 1, 1)), Some(103.2));
        assert_eq!(series.get(d(2021, 2, 1)), Some(103.8));
    }

    #[test]
    fn year_cell_updates_across_year_boundary() {
        let text = "Év;Idõszak;Összesen\n\
                    2021.;november;107,4\n\
                    ;december;107,9\n\
                    2022.;január;107,9\n";
        let series = parse_cpi(text);
        assert_eq!(series.get(d(2021, 12, 1)), Some(107.9));
        assert_eq!(series.get(d(2022, 1, 1)), Some(107.9));
    }

    #[test]
    fn unrecognized_month_names_drop_the_row() {
        let text = "Év;Időszak;Összesen\n\
                    2021.;január;103,2\n\
                    ;negyedév;999,9\n\
                    ;február;103,8\n";
        let series = parse_cpi(text);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d(2021, 1, 1)), Some(103.2));
    }

    #[test]
    fn thousands_separators_and_decimal_commas_normalize() {
        assert_eq!(parse_decimal("1 234,5"), Some(1234.5));
        assert_eq!(parse_decimal("103,2"), Some(103.2));
        assert_eq!(parse_decimal("x"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn falls_back_to_last_numeric_column_without_aggregate_header() {
        let text = "Év;Időszak;Élelmiszerek;Szolgáltatások\n\
                    2021.;január;104,1;102,6\n\
                    ;február;104,9;102,9\n";
        let series = parse_cpi(text);
        // Last numeric column is the services one.
        assert_eq!(series.get(d(2021, 1, 1)), Some(102.6));
        assert_eq!(series.get(d(2021, 2, 1)), Some(102.9));
    }

    #[test]
    fn no_rows_without_an_established_year() {
        // Month rows before any year cell cannot be dated.
        let text = "Év;Időszak;Összesen\n\
                    x2021x;január;103,2\n";
        assert!(parse_cpi(text).is_empty());
    }

    #[test]
    fn empty_or_headerless_input_yields_empty_series() {
        assert!(parse_cpi("").is_empty());
        assert!(parse_cpi("just;some;rows\n1;2;3\n").is_empty());
    }
}
