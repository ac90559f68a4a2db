use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL: &str = "info";

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `ferrous_doh=debug`.
    /// Ignored when `RUST_LOG` is set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}
