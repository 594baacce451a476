use tracing_subscriber::{fmt, EnvFilter};

/// Install the stdout subscriber. `RUST_LOG` wins over the `verbose` default.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}
