//! Tracing setup for the update-checker binary

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "update_checker=info";

/// Log to `log_file`, filtered by RUST_LOG (or `update_checker=info`).
///
/// `verbose` additionally mirrors debug output to stderr.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<WorkerGuard> {
    let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)?;

    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "update-checker.log".into());
    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter(verbose)))?;

    let stderr_layer = verbose.then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}

fn filter(verbose: bool) -> &'static str {
    if verbose {
        "update_checker=debug"
    } else {
        DEFAULT_FILTER
    }
}
