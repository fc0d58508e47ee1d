//! Tracing setup for the `mw` binary.
//!
//! `RUST_LOG` overrides the defaults, so `RUST_LOG=macrowatch=trace mw ...`
//! works without touching the code.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose {
        "macrowatch=debug,info"
    } else {
        "macrowatch=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false),
        )
        .init();
}
