//! Dataset acquisition and derivation shared by the subcommands.
//!
//! Each `load_*` helper goes through the disk cache gate and normalizes the
//! payload; any failure along the way degrades that one dataset to an empty
//! series instead of aborting the run. Only constructing the HTTP client can
//! fail here.

use tracing::{info, warn};

use crate::cache;
use crate::data::{ksh, EcbClient};
use crate::domain::{Country, Dataset, RunConfig, Series};
use crate::error::Result;
use crate::ingest;
use crate::transform::{self, Comparison};

/// Everything the `hungary` command reports and plots.
#[derive(Debug)]
pub struct HungaryRun {
    pub debt: Series,
    /// CPI index level as published.
    pub cpi: Series,
    /// Year-over-year inflation derived from `cpi`.
    pub inflation: Series,
}

/// Everything the `compare` command reports and plots.
#[derive(Debug)]
pub struct CompareRun {
    pub debt: Series,
    pub hicp: Series,
    pub cpi: Series,
    pub hicp_quarterly: Series,
    pub cpi_yoy_quarterly: Series,
    /// `None` when the two quarterly tracks share no dates.
    pub comparison: Option<Comparison>,
}

/// One country's slice of the European overview.
#[derive(Debug)]
pub struct CountryRun {
    pub country: Country,
    pub debt: Series,
    /// HICP annual rate of change (already a percentage, no derivation).
    pub inflation: Series,
}

pub fn run_hungary(config: &RunConfig) -> Result<HungaryRun> {
    let client = EcbClient::new()?;
    let debt = load_debt(config, &client, &Country::HUNGARY, false);
    let cpi = load_cpi(config);
    let inflation = transform::yoy(&cpi);
    Ok(HungaryRun {
        debt,
        cpi,
        inflation,
    })
}

pub fn run_compare(config: &RunConfig) -> Result<CompareRun> {
    let client = EcbClient::new()?;
    let debt = load_debt(config, &client, &Country::HUNGARY, false);
    let hicp = load_hicp(config, &client, &Country::HUNGARY, false);
    let cpi = load_cpi(config);

    // HICP already is an annual rate; the KSH index needs the YoY derivation.
    // Both go to quarterly means so the dates line up.
    let hicp_quarterly = transform::quarterly_mean(&hicp);
    let cpi_yoy_quarterly = transform::quarterly_mean(&transform::yoy(&cpi));
    let comparison = Comparison::compute(&cpi_yoy_quarterly, &hicp_quarterly);
    if comparison.is_none() {
        warn!("no overlapping quarters between the KSH and Eurostat tracks");
    }

    Ok(CompareRun {
        debt,
        hicp,
        cpi,
        hicp_quarterly,
        cpi_yoy_quarterly,
        comparison,
    })
}

pub fn run_europe(config: &RunConfig) -> Result<Vec<CountryRun>> {
    let client = EcbClient::new()?;
    Ok(Country::ALL
        .iter()
        .map(|country| {
            info!(country = country.code, "loading datasets");
            CountryRun {
                country: *country,
                debt: load_debt(config, &client, country, true),
                inflation: load_hicp(config, &client, country, true),
            }
        })
        .collect())
}

/// `scoped` selects the per-country cache name; the Hungary-only commands
/// keep the short unscoped names.
fn load_debt(config: &RunConfig, client: &EcbClient, country: &Country, scoped: bool) -> Series {
    let path = config.cache_path(Dataset::DebtGdp, scoped.then_some(country.code));
    let payload = cache::fetch_cached(&path, config.max_age, config.offline, || {
        client.fetch_debt_gdp(country)
    });
    normalized(Dataset::DebtGdp, country, payload.as_deref().map(ingest::parse_debt_gdp))
}

fn load_hicp(config: &RunConfig, client: &EcbClient, country: &Country, scoped: bool) -> Series {
    let path = config.cache_path(Dataset::Hicp, scoped.then_some(country.code));
    let payload = cache::fetch_cached(&path, config.max_age, config.offline, || {
        client.fetch_hicp(country)
    });
    normalized(Dataset::Hicp, country, payload.as_deref().map(ingest::parse_hicp))
}

fn load_cpi(config: &RunConfig) -> Series {
    let path = config.cache_path(Dataset::Cpi, None);
    let payload = cache::fetch_cached(&path, config.max_age, config.offline, || {
        ksh::fetch_cpi(ksh::CPI_URL)
    });
    normalized(Dataset::Cpi, &Country::HUNGARY, payload.as_deref().map(ingest::parse_cpi))
}

fn normalized(dataset: Dataset, country: &Country, series: Option<Series>) -> Series {
    match series {
        Some(series) if !series.is_empty() => {
            info!(
                dataset = dataset.display_name(),
                country = country.code,
                records = series.len(),
                "dataset normalized"
            );
            series
        }
        Some(_) => {
            warn!(
                dataset = dataset.display_name(),
                country = country.code,
                "payload yielded no usable rows"
            );
            Series::empty()
        }
        None => {
            warn!(
                dataset = dataset.display_name(),
                country = country.code,
                "dataset unavailable"
            );
            Series::empty()
        }
    }
}
