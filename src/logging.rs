//! Tracing subscriber setup for the command-line driver.

use std::io;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const LOG_FILTER: &str = "RUST_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` selects the filter, defaulting to `warn`; an explicit `level`
/// from the command line overrides it.
pub fn init_tracing_subscriber(level: Option<LevelFilter>) {
    let env_filter =
        EnvFilter::try_from_env(LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    if let Some(level) = level {
        builder.with_max_level(level).init();
    } else {
        builder.init();
    }
}
