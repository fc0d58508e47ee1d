//! Lenient tabular reader for the ECB CSV payloads.

use csv::ReaderBuilder;

/// A fully materialized CSV table: header labels plus string cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse `text` with row 0 as the header line.
    ///
    /// The upstream format is ambiguous about a pre-header line: when that
    /// interpretation fails (row 0 has a different field count than the rest)
    /// or yields zero data rows, retry once treating row 0 as a line to skip.
    pub fn read_lenient(text: &str) -> Option<Table> {
        match Table::read(text) {
            Some(table) if !table.rows.is_empty() => Some(table),
            _ => Table::read(skip_first_line(text)).filter(|t| !t.rows.is_empty()),
        }
    }

    fn read(text: &str) -> Option<Table> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .ok()?
            .iter()
            .map(normalize_header)
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return None;
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            // A malformed record (unequal field count) fails the whole
            // attempt so the caller can retry with row 0 skipped.
            let record = record.ok()?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Some(Table { headers, rows })
    }

    /// Cells of one column, top to bottom; short rows yield empty strings.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or(""))
    }
}

fn normalize_header(name: &str) -> String {
    // Strip a UTF-8 BOM; spreadsheet-style exports often prefix the first
    // header with one, which would break label matching.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn skip_first_line(text: &str) -> &str {
    text.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}
