//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while normalizing and comparing datasets
//! - exported or reloaded later for plotting

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A date-keyed observation series.
///
/// Invariants (enforced by the constructor, immutable afterwards):
///
/// - dates strictly increasing, no duplicates (the last value wins)
/// - every value is finite
///
/// The frequency is whatever the upstream feed delivered (quarterly for
/// debt/GDP, monthly for HICP/CPI); nothing here assumes a fixed step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn new(points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let map: BTreeMap<NaiveDate, f64> = points
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .collect();
        Self {
            points: map.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// Value at an exact date, if observed.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|idx| self.points[idx].1)
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.0, self.last()?.0))
    }

    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &(_, value) in &self.points {
            min = min.min(value);
            max = max.max(value);
        }
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }
}

/// One entry of the fixed country table: ISO code, display name, chart color.
///
/// Fixed at startup, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    /// Chart line color (RGB).
    pub color: (u8, u8, u8),
}

impl Country {
    pub const HUNGARY: Country = Country {
        code: "HU",
        name: "Hungary",
        color: (214, 39, 40),
    };

    /// Countries covered by the `europe` overview.
    pub const ALL: [Country; 8] = [
        Country::HUNGARY,
        Country {
            code: "GR",
            name: "Greece",
            color: (44, 160, 44),
        },
        Country {
            code: "IT",
            name: "Italy",
            color: (255, 127, 14),
        },
        Country {
            code: "FR",
            name: "France",
            color: (31, 119, 180),
        },
        Country {
            code: "DE",
            name: "Germany",
            color: (148, 103, 189),
        },
        Country {
            code: "ES",
            name: "Spain",
            color: (140, 86, 75),
        },
        Country {
            code: "PT",
            name: "Portugal",
            color: (227, 119, 194),
        },
        Country {
            code: "BE",
            name: "Belgium",
            color: (127, 127, 127),
        },
    ];
}

/// Which upstream dataset a payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Quarterly government gross debt as % of GDP (ECB GFS dataflow).
    DebtGdp,
    /// Monthly harmonized inflation, annual rate of change (ECB ICP dataflow).
    Hicp,
    /// Monthly consumer price index level (KSH stadat export).
    Cpi,
}

impl Dataset {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Dataset::DebtGdp => "debt/GDP",
            Dataset::Hicp => "HICP",
            Dataset::Cpi => "CPI",
        }
    }

    /// Deterministic cache file name. Country-scoped variants are used by the
    /// multi-country overview; the Hungary-only commands keep the short names.
    pub fn cache_name(self, country: Option<&str>) -> String {
        match (self, country) {
            (Dataset::DebtGdp, Some(code)) => {
                format!("ecb_debt_{}_cache.csv", code.to_lowercase())
            }
            (Dataset::DebtGdp, None) => "ecb_debt_cache.csv".to_string(),
            (Dataset::Hicp, Some(code)) => {
                format!("ecb_hicp_{}_cache.csv", code.to_lowercase())
            }
            (Dataset::Hicp, None) => "ecb_hicp_cache.csv".to_string(),
            (Dataset::Cpi, _) => "ksh_cpi_cache.csv".to_string(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults); nothing else reads the
/// environment or hardcoded paths.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding cached raw downloads.
    pub cache_dir: PathBuf,
    /// Directory receiving rendered charts.
    pub out_dir: PathBuf,
    /// Cache freshness threshold.
    pub max_age: Duration,
    /// Never hit the network; any cached copy counts as fresh.
    pub offline: bool,
    /// Render charts (disabled by `--no-chart`).
    pub charts: bool,
}

impl RunConfig {
    pub fn cache_path(&self, dataset: Dataset, country: Option<&str>) -> PathBuf {
        self.cache_dir.join(dataset.cache_name(country))
    }

    pub fn chart_path(&self, basename: &str) -> PathBuf {
        self.out_dir.join(basename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_sorts_and_dedups() {
        let s = Series::new(vec![
            (d(2021, 2, 1), 2.0),
            (d(2021, 1, 1), 1.0),
            (d(2021, 2, 1), 3.0),
        ]);
        assert_eq!(
            s.points(),
            &[(d(2021, 1, 1), 1.0), (d(2021, 2, 1), 3.0)]
        );
    }

    #[test]
    fn series_drops_non_finite_values() {
        let s = Series::new(vec![
            (d(2021, 1, 1), f64::NAN),
            (d(2021, 2, 1), f64::INFINITY),
            (d(2021, 3, 1), 5.0),
        ]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(d(2021, 3, 1)), Some(5.0));
    }

    #[test]
    fn cache_names_are_deterministic() {
        assert_eq!(Dataset::DebtGdp.cache_name(None), "ecb_debt_cache.csv");
        assert_eq!(
            Dataset::DebtGdp.cache_name(Some("HU")),
            "ecb_debt_hu_cache.csv"
        );
        assert_eq!(Dataset::Hicp.cache_name(Some("DE")), "ecb_hicp_de_cache.csv");
        assert_eq!(Dataset::Cpi.cache_name(Some("HU")), "ksh_cpi_cache.csv");
    }
}
