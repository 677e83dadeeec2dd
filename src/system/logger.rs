use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "VOLLEY_LOG";

/// Default directives keep HTTP client internals at `warn` so per-request
/// debug lines from the runner stay readable.
const fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,volley=debug"
    } else {
        "warn,volley=info"
    }
}

/// `VOLLEY_LOG` wins over `RUST_LOG`; a directive that does not parse falls
/// back to the defaults instead of silencing the run.
fn log_filter(volley_log: Option<&str>, rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    volley_log
        .or(rust_log)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber. Logs go to stderr so `convert` output
/// on stdout stays clean.
pub fn init_logging(verbose: bool, no_color: bool) {
    let volley_log = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(volley_log.as_deref(), rust_log.as_deref(), verbose);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
