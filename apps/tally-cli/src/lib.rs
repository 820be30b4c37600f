//! # tally-cli: Command Line Front End
//!
//! Loads configuration and sales documents, runs the report from
//! `tally-core`, and renders the result. The `tally` binary is a thin
//! wrapper around the functions here.
//!
//! ## Modules
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`error`] - CLI error types
//! - [`input`] - JSON document loading
//! - [`render`] - Table and JSON output
//!
//! Logging is installed in two steps: [`load_config`] runs under a scoped
//! stderr subscriber, then [`init_tracing`] installs the global one with the
//! loaded log level.

pub mod config;
pub mod error;
pub mod input;
pub mod render;

use std::path::{Path, PathBuf};

use tally_core::{analyze_value, AnalysisOptions, ReportRow, SimpleRevenue};
use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub use config::{OutputFormat, TallyConfig};
pub use error::{CliError, CliResult};

/// Filter used while the configuration itself is loading.
const BOOTSTRAP_LOG_LEVEL: &str = "warn";

/// Strategies for a report run: line-item revenue with the configured bonus tiers.
pub fn analysis_options(config: &TallyConfig) -> AnalysisOptions {
    AnalysisOptions::new(SimpleRevenue, config.bonus_policy())
}

/// Reads the document at `path` and builds its report.
pub fn build_report(path: &Path, config: &TallyConfig) -> CliResult<Vec<ReportRow>> {
    let document = input::read_document(path)?;
    let rows = analyze_value(&document, &analysis_options(config))?;
    info!(?path, rows = rows.len(), "Report ready");
    Ok(rows)
}

// =============================================================================
// Logging
// =============================================================================

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// ## Filter Priority
/// 1. `verbosity` from `-v` flags (1 = debug, 2+ = trace)
/// 2. `RUST_LOG`
/// 3. `fallback` (config `logging.level`, which `TALLY_LOG` already overrode)
pub fn init_tracing(verbosity: u8, fallback: &str) {
    let global = subscriber(env_filter(verbosity, fallback), std::io::stderr);
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(global);
}

/// Loads the configuration with a temporary stderr subscriber in place.
///
/// The global subscriber is built from the loaded `logging.level`, so it
/// cannot exist yet. Warnings raised while loading, such as an ignored
/// `TALLY_BONUS_*_BPS` value, go through this one instead.
pub fn load_config(path: Option<PathBuf>, verbosity: u8) -> CliResult<TallyConfig> {
    load_config_with_writer(path, verbosity, std::io::stderr)
}

fn load_config_with_writer<W>(
    path: Option<PathBuf>,
    verbosity: u8,
    writer: W,
) -> CliResult<TallyConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = subscriber(env_filter(verbosity, BOOTSTRAP_LOG_LEVEL), writer);
    tracing::subscriber::with_default(bootstrap, || TallyConfig::load(path))
}

fn env_filter(verbosity: u8, fallback: &str) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer)
        .finish()
}
