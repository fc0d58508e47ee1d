//! Series transforms and comparison statistics.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::Series;

/// Year-over-year percentage change of an index-level series.
///
/// Each observation is compared against the entry 12 positions earlier in
/// sorted order — not 12 calendar months, so a gap in the series shifts the
/// comparison point. The first 12 positions have no base and are omitted.
pub fn yoy(series: &Series) -> Series {
    let points = series.points();
    Series::new((12..points.len()).map(|idx| {
        let (date, value) = points[idx];
        let (_, base) = points[idx - 12];
        (date, (value / base - 1.0) * 100.0)
    }))
}

/// Calendar-quarter mean, keyed by the quarter-end date.
///
/// Used to align monthly inflation series with the quarterly debt feed
/// before comparing them.
pub fn quarterly_mean(series: &Series) -> Series {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for &(date, value) in series.points() {
        let entry = buckets.entry(quarter_end_of(date)).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    Series::new(
        buckets
            .into_iter()
            .map(|(date, (sum, count))| (date, sum / count as f64)),
    )
}

fn quarter_end_of(date: NaiveDate) -> NaiveDate {
    let quarter = date.month0() / 3 + 1;
    let month = quarter * 3;
    let day = if month == 3 || month == 12 { 31 } else { 30 };
    NaiveDate::from_ymd_opt(date.year(), month, day).unwrap_or(date)
}

/// Summary statistics over the common dates of two aligned series.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Number of common observation dates.
    pub n: usize,
    /// Mean of left minus right.
    pub mean_diff: f64,
    /// Sample standard deviation (n-1) of the differences; 0 when n < 2.
    pub std_diff: f64,
    pub max_abs_diff: f64,
    /// Pearson correlation; NaN when either side has zero variance.
    pub correlation: f64,
    /// Mean difference over the most recent 12 common dates.
    pub recent_mean_diff: f64,
    /// The per-date differences, for plotting.
    pub diff: Series,
}

impl Comparison {
    /// `None` when the two series share no observation dates.
    pub fn compute(left: &Series, right: &Series) -> Option<Comparison> {
        let pairs: Vec<(NaiveDate, f64, f64)> = left
            .points()
            .iter()
            .filter_map(|&(date, l)| right.get(date).map(|r| (date, l, r)))
            .collect();
        if pairs.is_empty() {
            return None;
        }

        let diffs: Vec<f64> = pairs.iter().map(|(_, l, r)| l - r).collect();
        let n = diffs.len();
        let mean_diff = mean(&diffs);
        let std_diff = sample_std(&diffs, mean_diff);
        let max_abs_diff = diffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));

        let lefts: Vec<f64> = pairs.iter().map(|(_, l, _)| *l).collect();
        let rights: Vec<f64> = pairs.iter().map(|(_, _, r)| *r).collect();
        let correlation = pearson(&lefts, &rights);

        let recent_mean_diff = mean(&diffs[n.saturating_sub(12)..]);

        let diff = Series::new(
            pairs
                .iter()
                .zip(&diffs)
                .map(|(&(date, _, _), &d)| (date, d)),
        );

        Some(Comparison {
            n,
            mean_diff,
            std_diff,
            max_abs_diff,
            correlation,
            recent_mean_diff,
            diff,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let mean_a = mean(a);
    let mean_b = mean(b);
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a).powi(2);
        var_b += (y - mean_b).powi(2);
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly(values: &[f64]) -> Series {
        Series::new(values.iter().enumerate().map(|(idx, &v)| {
            let year = 2020 + idx as i32 / 12;
            let month = (idx % 12) as u32 + 1;
            (d(year, month, 1), v)
        }))
    }

    #[test]
    fn yoy_compares_twelve_positions_back() {
        let mut values = vec![100.0; 24];
        values[12] = 110.0; // 1.10x the observation twelve positions earlier
        let series = monthly(&values);

        let result = yoy(&series);
        assert_eq!(result.len(), 12);
        let first = result.first().unwrap();
        assert_eq!(first.0, d(2021, 1, 1));
        assert!((first.1 - 10.0).abs() < 1e-12);
        // Positions 0-11 have no base and are absent.
        assert_eq!(result.get(d(2020, 12, 1)), None);
    }

    #[test]
    fn yoy_of_short_series_is_empty() {
        assert!(yoy(&monthly(&[100.0; 12])).is_empty());
        assert!(yoy(&Series::empty()).is_empty());
    }

    #[test]
    fn quarterly_mean_buckets_by_calendar_quarter() {
        let series = Series::new(vec![
            (d(2021, 1, 1), 1.0),
            (d(2021, 2, 1), 2.0),
            (d(2021, 3, 1), 3.0),
            (d(2021, 4, 1), 10.0),
        ]);
        let q = quarterly_mean(&series);
        assert_eq!(q.get(d(2021, 3, 31)), Some(2.0));
        assert_eq!(q.get(d(2021, 6, 30)), Some(10.0));
    }

    #[test]
    fn comparison_of_identical_series_is_degenerate() {
        let series = monthly(&[1.0, 2.0, 3.0, 4.0]);
        let cmp = Comparison::compute(&series, &series).unwrap();
        assert_eq!(cmp.n, 4);
        assert_eq!(cmp.mean_diff, 0.0);
        assert_eq!(cmp.max_abs_diff, 0.0);
        assert!((cmp.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn comparison_uses_common_dates_only() {
        let left = Series::new(vec![(d(2021, 3, 31), 5.0), (d(2021, 6, 30), 7.0)]);
        let right = Series::new(vec![(d(2021, 6, 30), 4.0), (d(2021, 9, 30), 9.0)]);
        let cmp = Comparison::compute(&left, &right).unwrap();
        assert_eq!(cmp.n, 1);
        assert_eq!(cmp.mean_diff, 3.0);
        assert_eq!(cmp.std_diff, 0.0);
    }

    #[test]
    fn disjoint_series_have_no_comparison() {
        let left = Series::new(vec![(d(2021, 3, 31), 5.0)]);
        let right = Series::new(vec![(d(2021, 6, 30), 4.0)]);
        assert!(Comparison::compute(&left, &right).is_none());
    }
}
