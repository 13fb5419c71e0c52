//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

/// Install the global subscriber.
///
/// `verbose` forces debug output for this crate; otherwise `RUST_LOG` is
/// honoured, falling back to `default_filter`.
pub fn init(verbose: bool, default_filter: &str, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("items_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
