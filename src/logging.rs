use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "LEGAL_RISK_LOG";

/// Install the stderr `tracing` subscriber.
///
/// `LEGAL_RISK_LOG` wins when set; otherwise `warn`, or `legal_risk=debug`
/// under `--verbose`. Output goes to stderr so JSON on stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "warn,legal_risk=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
