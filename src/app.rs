//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs the acquisition pipeline for the chosen command
//! - prints the console summary
//! - renders charts (failures are logged, never fatal)

use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing::warn;

use crate::cli::{Cli, Command, RunArgs};
use crate::domain::{Country, RunConfig, Series};
use crate::error::Result;
use crate::{plot, report};

pub mod pipeline;

/// Entry point for the `mw` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Hungary(args) => handle_hungary(&run_config_from_args(&args)?),
        Command::Compare(args) => handle_compare(&run_config_from_args(&args)?),
        Command::Europe(args) => handle_europe(&run_config_from_args(&args)?),
    }
}

fn run_config_from_args(args: &RunArgs) -> Result<RunConfig> {
    let config = RunConfig {
        cache_dir: args.cache_dir.clone(),
        out_dir: args.out_dir.clone(),
        max_age: Duration::from_secs(args.max_age_hours * 3600),
        offline: args.offline,
        charts: !args.no_chart,
    };
    fs::create_dir_all(&config.cache_dir)?;
    if config.charts {
        fs::create_dir_all(&config.out_dir)?;
    }
    Ok(config)
}

fn handle_hungary(config: &RunConfig) -> Result<()> {
    let run = pipeline::run_hungary(config)?;
    print!("{}", report::format_hungary_summary(&run, config));

    if config.charts {
        render_chart(config, "debt_to_gdp_q.svg", |path| {
            plot::single_series(
                path,
                "Hungary: government debt (% of GDP)",
                "% of GDP",
                &run.debt,
                (31, 119, 180),
            )
        });
        render_chart(config, "cpi_yoy.svg", |path| {
            plot::single_series(
                path,
                "Hungary: CPI inflation (% y/y)",
                "% y/y",
                &run.inflation,
                (214, 39, 40),
            )
        });
    }
    Ok(())
}

fn handle_compare(config: &RunConfig) -> Result<()> {
    let run = pipeline::run_compare(config)?;
    print!("{}", report::format_compare_summary(&run, config));

    if config.charts {
        render_chart(config, "ksh_vs_eurostat_comparison.svg", |path| {
            plot::comparison_grid(
                path,
                &run.debt,
                &run.hicp_quarterly,
                &run.cpi_yoy_quarterly,
                run.comparison.as_ref(),
            )
        });
    }
    Ok(())
}

fn handle_europe(config: &RunConfig) -> Result<()> {
    let runs = pipeline::run_europe(config)?;
    print!("{}", report::format_europe_summary(&runs));

    if config.charts {
        let debt: Vec<(Country, Series)> = runs
            .iter()
            .map(|run| (run.country, run.debt.clone()))
            .collect();
        let inflation: Vec<(Country, Series)> = runs
            .iter()
            .map(|run| (run.country, run.inflation.clone()))
            .collect();

        render_chart(config, "eu_debt_comparison.svg", |path| {
            plot::multi_country(path, "Government debt (% of GDP)", "% of GDP", &debt)
        });
        render_chart(config, "eu_inflation_comparison.svg", |path| {
            plot::multi_country(path, "HICP inflation (% y/y)", "% y/y", &inflation)
        });

        if let Some(hungary) = runs
            .iter()
            .find(|run| run.country.code == Country::HUNGARY.code)
        {
            render_chart(config, "hungary_combined_analysis.svg", |path| {
                plot::dual_axis(
                    path,
                    "Hungary: debt vs inflation",
                    &hungary.debt,
                    &hungary.inflation,
                )
            });
        }
    }
    Ok(())
}

/// Run one chart renderer; a failed or skipped chart never fails the run.
/// The renderer reports whether it actually drew a file.
fn render_chart<F>(config: &RunConfig, name: &str, render: F)
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let path = config.chart_path(name);
    match render(&path) {
        Ok(true) => println!("chart: {}", path.display()),
        Ok(false) => {}
        Err(err) => warn!(chart = name, error = %err, "chart rendering failed"),
    }
}
