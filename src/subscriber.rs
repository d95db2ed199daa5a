//! Tracing subscriber setup for the `logsink` binary.
use std::sync::Arc;

use crate::layer::LogFileLayer;
use crate::manager::LogFile;

/// Initialise the global [`tracing`] subscriber.
///
/// Diagnostics go to stderr, filtered by `RUST_LOG` or, when unset, by
/// `verbose` (`debug` vs. `warn`). If `sink` is given, events from other
/// crates are also written to it through a [`LogFileLayer`]. Must be called
/// once at program startup.
pub fn init_subscriber(verbose: bool, sink: Option<Arc<LogFile>>) {
    use tracing_subscriber::{
        EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .with_filter(env_filter);

    let file_layer = sink.map(LogFileLayer::new);

    // A subscriber may already be set (e.g. by tests); keep it.
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
