use thiserror::Error;

/// Failures while loading or checking the configuration. All are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    FileRead { path: String, reason: String },

    /// Malformed TOML or an unparseable value such as a duration.
    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("configuration rejected: {0}")]
    Validation(String),
}
