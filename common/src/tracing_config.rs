//! Tracing subscriber setup.
//!
//! Logs go to stderr so that the console report owns stdout.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Build a config from the process environment.
    ///
    /// `LOG_FORMAT=json` switches to JSON lines.
    #[must_use]
    pub fn from_env() -> Self {
        let json_output = std::env::var("LOG_FORMAT")
            .is_ok_and(|format| format.eq_ignore_ascii_case("json"));
        Self {
            json_output,
            ..Self::default()
        }
    }

    /// Set a custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Raise the default level to `debug` when `debug` is set.
    #[must_use]
    pub fn with_debug(self, debug: bool) -> Self {
        if debug { self.with_log_level("debug") } else { self }
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// Sets the global subscriber; call once at startup. A second call is a
/// no-op.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // try_init only fails when a global subscriber is already installed
    let _ = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };
}
