//! `tracing` subscriber setup
//!
//! Library code only emits events through the `tracing` macros. The binary calls
//! [`init_logging`] once at startup to install a subscriber that filters by level
//! (respecting `RUST_LOG`) and prints either human-readable lines or JSON.
//!
//! ```no_run
//! use dockplan::util::logging;
//!
//! // DOCKPLAN_LOG_LEVEL=debug DOCKPLAN_LOG_JSON=true
//! logging::init_from_env();
//! tracing::info!(root = "/srv/app", "Preparing build");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "DOCKPLAN_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "DOCKPLAN_LOG_JSON";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Emit one JSON object per event instead of formatted lines
    pub use_json: bool,
    pub include_target: bool,
    /// File and line of the emitting call site
    pub include_location: bool,
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with every piece of call-site metadata, for log collectors.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
            include_location: true,
            include_thread_ids: false,
        }
    }
}

/// Level by name, case-insensitive. `None` for anything unrecognized.
pub fn try_parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Like [`try_parse_level`], falling back to INFO with a note on stderr.
///
/// ```
/// use dockplan::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    try_parse_level(level_str).unwrap_or_else(|| {
        eprintln!(
            "Unknown log level '{}', using info (expected trace, debug, info, warn or error)",
            level_str
        );
        Level::INFO
    })
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(
            format!("dockplan={}", config.level)
                .parse()
                .expect("crate log directive is valid"),
        );

        let registry = tracing_subscriber::registry().with(filter);
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        if config.use_json {
            registry.with(layer.json()).init();
        } else {
            registry.with(layer).init();
        }
    });
}

/// Configure from `DOCKPLAN_LOG_LEVEL` and `DOCKPLAN_LOG_JSON`.
pub fn init_from_env() {
    init_logging(config_from_lookup(|key| env::var(key).ok()));
}

pub(crate) fn config_from_lookup<F>(lookup: F) -> LoggingConfig
where
    F: Fn(&str) -> Option<String>,
{
    let level = lookup(LOG_LEVEL_ENV)
        .map(|s| parse_level(&s))
        .unwrap_or(Level::INFO);
    let use_json = lookup(LOG_JSON_ENV)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false);

    LoggingConfig {
        level,
        use_json,
        ..Default::default()
    }
}
