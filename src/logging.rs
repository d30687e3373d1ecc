use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "info,weekplan=debug";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Output goes to stderr so `--json` output on stdout stays machine readable.
/// Records from the `log` crate (actix-web's request logger) are bridged in.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
