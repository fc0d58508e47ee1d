//! Command-line parsing for the macro data watcher.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the acquisition/transform code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "mw",
    version,
    about = "Macro time-series watcher (ECB SDW + KSH feeds)"
)]
pub struct Cli {
    /// Debug-level logging for this crate.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hungarian government debt and KSH consumer-price inflation.
    Hungary(RunArgs),
    /// Cross-check KSH CPI inflation against the Eurostat HICP track.
    Compare(RunArgs),
    /// Debt and inflation overview across eight European countries.
    Europe(RunArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Directory holding cached raw downloads.
    #[arg(long, value_name = "DIR", default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Directory receiving rendered charts.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Reuse cached downloads younger than this many hours.
    #[arg(long, default_value_t = 24)]
    pub max_age_hours: u64,

    /// Never hit the network; any cached copy counts as fresh.
    #[arg(long)]
    pub offline: bool,

    /// Skip chart rendering.
    #[arg(long)]
    pub no_chart: bool,
}
