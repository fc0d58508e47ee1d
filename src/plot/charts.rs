//! SVG chart rendering with Plotters.
//!
//! Why the SVG backend instead of a bitmap one?
//! - no native font stack required (the bitmap backends pull in fontconfig
//!   via font-kit, which breaks on minimal containers)
//! - text lands as SVG elements, so the browser does the rasterizing
//!
//! Dates are mapped to fractional years on the x axis; every series here is
//! coarse enough (monthly or quarterly) that this is indistinguishable from a
//! proper date axis and it keeps the coordinate types plain `f64`.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{Country, Series};
use crate::error::{AppError, Result};
use crate::transform::Comparison;

/// Event lines drawn on the multi-country overview charts.
const CRISIS_MARKERS: [(i32, u32, u32, &str); 3] = [
    (2008, 9, 15, "2008 crisis"),
    (2020, 3, 15, "COVID-19"),
    (2022, 2, 24, "War in Ukraine"),
];

const SINGLE_SIZE: (u32, u32) = (1200, 700);
const GRID_SIZE: (u32, u32) = (1600, 1200);

fn chart_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Chart(err.to_string())
}

fn year_frac(date: NaiveDate) -> f64 {
    date.year() as f64 + date.ordinal0() as f64 / 365.25
}

fn to_xy(series: &Series) -> Vec<(f64, f64)> {
    series
        .points()
        .iter()
        .map(|&(date, value)| (year_frac(date), value))
        .collect()
}

/// Bounds with 5% headroom on both sides; degenerate spans get a unit pad so
/// Plotters never sees an empty range.
fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn series_color(color: (u8, u8, u8)) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn line_style(color: RGBColor) -> ShapeStyle {
    ShapeStyle::from(&color).stroke_width(2)
}

/// One line, one y axis. Used for the standalone debt and inflation charts.
///
/// Returns whether a file was drawn; empty input skips the file entirely.
pub fn single_series(
    path: &Path,
    caption: &str,
    y_desc: &str,
    series: &Series,
    color: (u8, u8, u8),
) -> Result<bool> {
    let Some((first, last)) = series.date_bounds() else {
        return Ok(false);
    };
    let Some((y_min, y_max)) = series.value_bounds() else {
        return Ok(false);
    };
    let (x0, x1) = padded(year_frac(first), year_frac(last));
    let (y0, y1) = padded(y_min, y_max);

    let root = SVGBackend::new(path, SINGLE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 28))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(to_xy(series), line_style(series_color(color))))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}

/// One line per country, shared y axis, with crisis markers and a legend.
/// Countries whose series came back empty are left out of the legend.
pub fn multi_country(
    path: &Path,
    caption: &str,
    y_desc: &str,
    lines: &[(Country, Series)],
) -> Result<bool> {
    if lines.iter().all(|(_, series)| series.is_empty()) {
        return Ok(false);
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, series) in lines {
        if let (Some((first, last)), Some((lo, hi))) =
            (series.date_bounds(), series.value_bounds())
        {
            x_min = x_min.min(year_frac(first));
            x_max = x_max.max(year_frac(last));
            y_min = y_min.min(lo);
            y_max = y_max.max(hi);
        }
    }
    let (x0, x1) = padded(x_min, x_max);
    let (y0, y1) = padded(y_min, y_max);

    let root = SVGBackend::new(path, SINGLE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 28))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(chart_err)?;

    for (country, series) in lines.iter().filter(|(_, series)| !series.is_empty()) {
        let color = series_color(country.color);
        chart
            .draw_series(LineSeries::new(to_xy(series), line_style(color)))
            .map_err(chart_err)?
            .label(country.name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_style(color))
            });
    }

    draw_crisis_markers(&mut chart, x0, x1, y0, y1)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}

fn draw_crisis_markers(
    chart: &mut ChartContext<'_, SVGBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
) -> Result<()> {
    for (year, month, day, label) in CRISIS_MARKERS {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let x = year_frac(date);
        if x <= x0 || x >= x1 {
            continue;
        }
        let style = ShapeStyle::from(&BLACK.mix(0.35)).stroke_width(1);
        chart
            .draw_series(LineSeries::new(vec![(x, y0), (x, y1)], style))
            .map_err(chart_err)?;
        chart
            .draw_series(std::iter::once(Text::new(
                label,
                (x, y1 - (y1 - y0) * 0.03),
                ("sans-serif", 13),
            )))
            .map_err(chart_err)?;
    }
    Ok(())
}

/// 2x2 panel comparing the national CPI track with the harmonized one:
/// debt context, the two quarterly inflation lines, their difference, and a
/// scatter against the identity line.
pub fn comparison_grid(
    path: &Path,
    debt: &Series,
    hicp_quarterly: &Series,
    cpi_yoy_quarterly: &Series,
    comparison: Option<&Comparison>,
) -> Result<bool> {
    if debt.is_empty() && hicp_quarterly.is_empty() && cpi_yoy_quarterly.is_empty() {
        return Ok(false);
    }

    let root = SVGBackend::new(path, GRID_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let panels = root.split_evenly((2, 2));

    line_panel(
        &panels[0],
        "Government debt (% of GDP)",
        "% of GDP",
        &[("debt/GDP", (31, 119, 180), debt)],
    )?;
    line_panel(
        &panels[1],
        "Quarterly inflation: KSH vs Eurostat",
        "% y/y",
        &[
            ("Eurostat HICP", (31, 119, 180), hicp_quarterly),
            ("KSH CPI", (214, 39, 40), cpi_yoy_quarterly),
        ],
    )?;

    match comparison {
        Some(cmp) => {
            line_panel(
                &panels[2],
                "Difference (KSH - Eurostat)",
                "pp",
                &[("difference", (148, 103, 189), &cmp.diff)],
            )?;
            scatter_panel(&panels[3], cpi_yoy_quarterly, hicp_quarterly)?;
        }
        None => {
            no_data_note(&panels[2])?;
            no_data_note(&panels[3])?;
        }
    }

    root.present().map_err(chart_err)?;
    Ok(true)
}

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn no_data_note(panel: &Panel<'_>) -> Result<()> {
    panel
        .draw(&Text::new("no overlapping data", (40, 40), ("sans-serif", 20)))
        .map_err(chart_err)?;
    Ok(())
}

fn line_panel(
    panel: &Panel<'_>,
    caption: &str,
    y_desc: &str,
    lines: &[(&str, (u8, u8, u8), &Series)],
) -> Result<()> {
    if lines.iter().all(|(_, _, series)| series.is_empty()) {
        return no_data_note(panel);
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, _, series) in lines {
        if let (Some((first, last)), Some((lo, hi))) =
            (series.date_bounds(), series.value_bounds())
        {
            x_min = x_min.min(year_frac(first));
            x_max = x_max.max(year_frac(last));
            y_min = y_min.min(lo);
            y_max = y_max.max(hi);
        }
    }
    let (x0, x1) = padded(x_min, x_max);
    let (y0, y1) = padded(y_min, y_max);

    let mut chart = ChartBuilder::on(panel)
        .margin(15)
        .caption(caption, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(chart_err)?;

    // Zero line for panels whose data straddles it.
    if y0 < 0.0 && y1 > 0.0 {
        chart
            .draw_series(LineSeries::new(
                vec![(x0, 0.0), (x1, 0.0)],
                ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1),
            ))
            .map_err(chart_err)?;
    }

    let mut drawn = 0;
    for &(label, color, series) in lines.iter().filter(|(_, _, series)| !series.is_empty()) {
        let color = series_color(color);
        chart
            .draw_series(LineSeries::new(to_xy(series), line_style(color)))
            .map_err(chart_err)?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_style(color))
            });
        drawn += 1;
    }

    if drawn > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;
    }
    Ok(())
}

/// Scatter of the two quarterly inflation measures over their common dates,
/// with the identity line for reference.
fn scatter_panel(panel: &Panel<'_>, left: &Series, right: &Series) -> Result<()> {
    let pairs: Vec<(f64, f64)> = left
        .points()
        .iter()
        .filter_map(|&(date, l)| right.get(date).map(|r| (l, r)))
        .collect();
    if pairs.is_empty() {
        return no_data_note(panel);
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(l, r) in &pairs {
        lo = lo.min(l).min(r);
        hi = hi.max(l).max(r);
    }
    let (b0, b1) = padded(lo, hi);

    let mut chart = ChartBuilder::on(panel)
        .margin(15)
        .caption("KSH vs Eurostat (quarterly, % y/y)", ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(b0..b1, b0..b1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("KSH CPI")
        .y_desc("Eurostat HICP")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            vec![(b0, b0), (b1, b1)],
            ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1),
        ))
        .map_err(chart_err)?;

    chart
        .draw_series(
            pairs
                .iter()
                .map(|&(l, r)| Circle::new((l, r), 3, RGBColor(214, 39, 40).filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}

/// Debt on the left axis, inflation on the right, one chart. The two series
/// have different units, so each keeps its own scale.
pub fn dual_axis(
    path: &Path,
    caption: &str,
    debt: &Series,
    inflation: &Series,
) -> Result<bool> {
    let (Some(debt_dates), Some(infl_dates)) = (debt.date_bounds(), inflation.date_bounds())
    else {
        return Ok(false);
    };
    let (Some((d_lo, d_hi)), Some((i_lo, i_hi))) =
        (debt.value_bounds(), inflation.value_bounds())
    else {
        return Ok(false);
    };

    let (x0, x1) = padded(
        year_frac(debt_dates.0).min(year_frac(infl_dates.0)),
        year_frac(debt_dates.1).max(year_frac(infl_dates.1)),
    );
    let (d0, d1) = padded(d_lo, d_hi);
    let (i0, i1) = padded(i_lo, i_hi);

    let root = SVGBackend::new(path, SINGLE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 28))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x0..x1, d0..d1)
        .map_err(chart_err)?
        .set_secondary_coord(x0..x1, i0..i1);

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Debt (% of GDP)")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(chart_err)?;
    chart
        .configure_secondary_axes()
        .y_desc("Inflation (% y/y)")
        .draw()
        .map_err(chart_err)?;

    let debt_color = RGBColor(31, 119, 180);
    let infl_color = RGBColor(214, 39, 40);

    chart
        .draw_series(LineSeries::new(to_xy(debt), line_style(debt_color)))
        .map_err(chart_err)?
        .label("Debt (% of GDP)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style(debt_color)));
    chart
        .draw_secondary_series(LineSeries::new(to_xy(inflation), line_style(infl_color)))
        .map_err(chart_err)?
        .label("Inflation (% y/y)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style(infl_color)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}
