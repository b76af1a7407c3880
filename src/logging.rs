//! Logging functionality for design-lens
//!
//! Both binaries log through `tracing`. Output is written to stderr: stdout
//! carries the JSON-RPC stream of the tool server and the progress messages
//! of the CLI.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "DESIGN_LENS_LOG";

/// Log levels supported by design-lens.
///
/// These map to the tracing level hierarchy: ERROR, WARN, INFO, DEBUG, TRACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Error logs only
    Error,
    /// Warning and error logs
    Warn,
    /// Info, warning, and error logs
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// Default filter directive for this crate at the given level.
    pub fn directive(self) -> String {
        format!("design_lens={}", self.to_tracing_level())
    }
}

/// Initialize logging with a specific log level.
///
/// Call once at the start of the process.
///
/// ```no_run
/// use design_lens::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Warn);
/// tracing::warn!("shown");
/// tracing::info!("hidden");
/// ```
///
/// Setting `DESIGN_LENS_LOG` takes precedence over `level`:
///
/// ```bash
/// DESIGN_LENS_LOG=design_lens=debug design-lens page.png
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    tracing::debug!("design-lens logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter string.
///
/// ```no_run
/// use design_lens::logging::init_logging_with_filter;
///
/// init_logging_with_filter("design_lens=debug,design_lens::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        eprintln!("Invalid log filter {:?}, using design_lens=info", filter);
        EnvFilter::new(LogLevel::Info.directive())
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    tracing::debug!("design-lens logging initialized with custom filter: {}", filter);
}
