//! Log level selection and tracing subscriber setup shared by every binary.

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Library crates whose events follow the binary's level.
const WORKSPACE_CRATES: &[&str] = &["ratings_core", "ratings_client", "ratings_http"];

/// Severity threshold. Only events at or above the selected level are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warning,
    Critical,
}

impl LogLevel {
    /// Level from `LOG_LEVEL`, falling back to `Debug` when unset or invalid.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var("LOG_LEVEL").ok().as_deref())
    }

    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Critical => "error",
        }
    }

    /// Filter directive applying this level to `crate_name` and the shared
    /// workspace crates, and at most `info` to everything else.
    pub fn directive(&self, crate_name: &str) -> String {
        let level = self.as_filter();
        let others = if *self > LogLevel::Info { level } else { "info" };

        let mut directive = format!("{},{}={}", others, crate_name, level);
        for shared in WORKSPACE_CRATES.iter().filter(|c| **c != crate_name) {
            directive.push_str(&format!(",{}={}", shared, level));
        }
        directive
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Install the global subscriber for a binary.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` picks the level for
/// `crate_name`. `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(crate_name: &str) {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::from_env().directive(crate_name)));

    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
