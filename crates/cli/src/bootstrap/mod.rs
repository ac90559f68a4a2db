use ferrous_doh_domain::{CliOverrides, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Load, override and validate the configuration.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over `logging.level` when set.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_startup_summary(config: &Config) {
    info!("Starting Ferrous DoH v{}", env!("CARGO_PKG_VERSION"));
    info!(
        listen_address = %config.server.listen_address,
        doh_url = %config.upstream.doh_url(),
        proxy = config.upstream.proxy.is_some(),
        timeout_ms = config.upstream.query_timeout_ms,
        parallel_questions = config.upstream.parallel_questions,
        "Configuration loaded"
    );

    if config.upstream.insecure_tls {
        warn!("insecure_tls is enabled: DoH server certificates will not be verified");
    }
}
