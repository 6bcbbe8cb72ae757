use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["jalali", "jalali_date"];

/// Initialize tracing on STDERR, `debug` for the crates if `--debug` is set and `warn` otherwise.
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "warn" };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
