//! Ferrous DoH Domain Layer
pub mod config;
pub mod errors;

pub use config::{
    parse_duration, CliOverrides, Config, ConfigError, LoggingConfig, ServerConfig,
    UpstreamConfig,
};
pub use errors::DomainError;
