//! Structured logging setup
//!
//! Provides JSON-formatted and human-readable logging on stderr so that
//! rendered pages printed to stdout stay clean.

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging based on configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Arguments
///
/// * `config` - Logging configuration
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber was
/// already installed
///
/// # Examples
///
/// ```no_run
/// use parel_portal::config::LoggingConfig;
/// use parel_portal::logging::init_tracing;
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     json_format: false,
/// };
/// init_tracing(&config).unwrap();
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

/// Runs `f` with a temporary stderr subscriber.
///
/// Used while the configuration that decides the real subscriber is being
/// loaded, so warnings raised during loading are not lost. `RUST_LOG`
/// takes precedence over `level`.
///
/// # Examples
///
/// ```
/// use parel_portal::logging::with_bootstrap_logging;
///
/// let answer = with_bootstrap_logging("warn", || {
///     tracing::warn!("emitted before the global subscriber exists");
///     42
/// });
/// assert_eq!(answer, 42);
/// ```
pub fn with_bootstrap_logging<T>(level: &str, f: impl FnOnce() -> T) -> T {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr));
    tracing::subscriber::with_default(subscriber, f)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?)
}
