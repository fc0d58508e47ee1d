//! Console summaries for each subcommand.

use chrono::{Datelike, NaiveDate};

use crate::app::pipeline::{CompareRun, CountryRun, HungaryRun};
use crate::domain::{Dataset, RunConfig, Series};

/// `YYYY-Qn` label for a quarterly observation date.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), date.month0() / 3 + 1)
}

/// One line per dataset: record count, covered range, latest value.
fn dataset_line(label: &str, series: &Series, unit: &str, quarterly: bool) -> String {
    match (series.date_bounds(), series.last()) {
        (Some((first, last)), Some((_, latest))) => {
            let latest_label = if quarterly {
                quarter_label(last)
            } else {
                format!("{}-{:02}", last.year(), last.month())
            };
            format!(
                "{label}: {} records ({} .. {}) | latest {latest_label}: {latest:.1}{unit}\n",
                series.len(),
                first,
                last,
            )
        }
        _ => format!("{label}: no data\n"),
    }
}

pub fn format_hungary_summary(run: &HungaryRun, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== mw - Hungary: government debt & inflation ===\n");
    out.push_str(&dataset_line("Debt (% of GDP)", &run.debt, "%", true));
    out.push_str(&dataset_line("CPI index", &run.cpi, "", false));
    out.push_str(&dataset_line("CPI inflation (y/y)", &run.inflation, "%", false));
    out.push_str(&format_cache_listing(
        config,
        &[(Dataset::DebtGdp, None), (Dataset::Cpi, None)],
    ));

    out
}

pub fn format_compare_summary(run: &CompareRun, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== mw - Hungary: KSH CPI vs Eurostat HICP ===\n");
    out.push_str(&dataset_line("Debt (% of GDP)", &run.debt, "%", true));
    out.push_str(&dataset_line("HICP (y/y)", &run.hicp, "%", false));
    out.push_str(&dataset_line("CPI index", &run.cpi, "", false));
    out.push_str(&dataset_line(
        "HICP quarterly mean",
        &run.hicp_quarterly,
        "%",
        true,
    ));
    out.push_str(&dataset_line(
        "CPI y/y quarterly mean",
        &run.cpi_yoy_quarterly,
        "%",
        true,
    ));

    out.push_str("\nKSH minus Eurostat (quarterly, pp):\n");
    match &run.comparison {
        Some(cmp) => {
            out.push_str(&format!("- common quarters : {}\n", cmp.n));
            out.push_str(&format!("- mean difference : {:+.2}\n", cmp.mean_diff));
            out.push_str(&format!("- std of diff     : {:.2}\n", cmp.std_diff));
            out.push_str(&format!("- max |diff|      : {:.2}\n", cmp.max_abs_diff));
            if cmp.correlation.is_finite() {
                out.push_str(&format!("- correlation     : {:.3}\n", cmp.correlation));
            } else {
                out.push_str("- correlation     : n/a (zero variance)\n");
            }
            out.push_str(&format!(
                "- last 12 quarters: {:+.2} mean\n",
                cmp.recent_mean_diff
            ));
        }
        None => out.push_str("- no overlapping quarters\n"),
    }

    out.push_str(&format_cache_listing(
        config,
        &[
            (Dataset::DebtGdp, None),
            (Dataset::Hicp, None),
            (Dataset::Cpi, None),
        ],
    ));

    out
}

pub fn format_europe_summary(runs: &[CountryRun]) -> String {
    let mut out = String::new();

    out.push_str("=== mw - European overview ===\n");
    out.push_str(&format!(
        "{:<10} {:>16} {:>18}\n",
        "Country", "Debt (% GDP)", "Inflation (% y/y)"
    ));
    for run in runs {
        out.push_str(&format!(
            "{:<10} {:>16} {:>18}\n",
            run.country.name,
            latest_cell(&run.debt),
            latest_cell(&run.inflation),
        ));
    }

    let loaded = runs
        .iter()
        .filter(|run| !run.debt.is_empty() || !run.inflation.is_empty())
        .count();
    out.push_str(&format!(
        "\n{loaded}/{} countries with at least one dataset\n",
        runs.len()
    ));

    out
}

fn latest_cell(series: &Series) -> String {
    match series.last() {
        Some((_, value)) => format!("{value:.1}"),
        None => "-".to_string(),
    }
}

/// Cache files backing this run, with sizes. Missing files are skipped.
fn format_cache_listing(config: &RunConfig, entries: &[(Dataset, Option<&str>)]) -> String {
    let mut out = String::new();
    for &(dataset, country) in entries {
        let path = config.cache_path(dataset, country);
        if let Ok(meta) = std::fs::metadata(&path) {
            out.push_str(&format!(
                "cache: {} ({} bytes)\n",
                path.display(),
                meta.len()
            ));
        }
    }
    if !out.is_empty() {
        out.insert(0, '\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Country;
    use crate::transform::Comparison;
    use std::path::PathBuf;
    use std::time::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            cache_dir: dir.to_path_buf(),
            out_dir: PathBuf::from("."),
            max_age: Duration::from_secs(3600),
            offline: false,
            charts: false,
        }
    }

    #[test]
    fn quarter_labels_cover_all_quarters() {
        assert_eq!(quarter_label(d(2024, 3, 31)), "2024-Q1");
        assert_eq!(quarter_label(d(2024, 6, 30)), "2024-Q2");
        assert_eq!(quarter_label(d(2024, 9, 30)), "2024-Q3");
        assert_eq!(quarter_label(d(2024, 12, 31)), "2024-Q4");
    }

    #[test]
    fn hungary_summary_reports_ranges_and_latest() {
        let dir = tempfile::tempdir().unwrap();
        let run = HungaryRun {
            debt: Series::new(vec![(d(2023, 12, 31), 73.5), (d(2024, 3, 31), 73.9)]),
            cpi: Series::new(vec![(d(2024, 1, 1), 103.8)]),
            inflation: Series::empty(),
        };
        let out = format_hungary_summary(&run, &config(dir.path()));
        assert!(out.contains("Debt (% of GDP): 2 records"));
        assert!(out.contains("latest 2024-Q1: 73.9%"));
        assert!(out.contains("CPI inflation (y/y): no data"));
    }

    #[test]
    fn compare_summary_includes_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let left = Series::new(vec![(d(2024, 3, 31), 4.0), (d(2024, 6, 30), 4.4)]);
        let right = Series::new(vec![(d(2024, 3, 31), 3.7), (d(2024, 6, 30), 4.0)]);
        let run = CompareRun {
            debt: Series::empty(),
            hicp: Series::empty(),
            cpi: Series::empty(),
            hicp_quarterly: right.clone(),
            cpi_yoy_quarterly: left.clone(),
            comparison: Comparison::compute(&left, &right),
        };
        let out = format_compare_summary(&run, &config(dir.path()));
        assert!(out.contains("common quarters : 2"));
        assert!(out.contains("mean difference : +0.35"));
    }

    #[test]
    fn compare_summary_handles_missing_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let run = CompareRun {
            debt: Series::empty(),
            hicp: Series::empty(),
            cpi: Series::empty(),
            hicp_quarterly: Series::empty(),
            cpi_yoy_quarterly: Series::empty(),
            comparison: None,
        };
        let out = format_compare_summary(&run, &config(dir.path()));
        assert!(out.contains("no overlapping quarters"));
    }

    #[test]
    fn europe_summary_marks_missing_datasets() {
        let runs = vec![
            CountryRun {
                country: Country::HUNGARY,
                debt: Series::new(vec![(d(2024, 3, 31), 73.9)]),
                inflation: Series::empty(),
            },
            CountryRun {
                country: Country::ALL[1],
                debt: Series::empty(),
                inflation: Series::empty(),
            },
        ];
        let out = format_europe_summary(&runs);
        assert!(out.contains("Hungary"));
        assert!(out.contains("73.9"));
        assert!(out.contains("1/2 countries"));
    }

    #[test]
    fn cache_listing_reports_existing_files_with_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        std::fs::write(cfg.cache_path(Dataset::Cpi, None), "payload").unwrap();

        let out = format_cache_listing(&cfg, &[(Dataset::Cpi, None), (Dataset::Hicp, None)]);
        assert!(out.contains("ksh_cpi_cache.csv (7 bytes)"));
        assert!(!out.contains("ecb_hicp_cache.csv"));
    }
}
