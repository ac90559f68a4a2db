use clap::Parser;
use ferrous_doh_domain::{parse_duration, CliOverrides};
use std::time::Duration;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser, Debug)]
#[command(name = "ferrous-doh")]
#[command(version)]
#[command(about = "Ferrous DoH - plain DNS over UDP forwarded to a DNS-over-HTTPS resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP listen address (host:port)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,

    /// DoH server hostname; queries go to https://<host>/dns-query
    #[arg(long = "dohserver", value_name = "HOST")]
    doh_server: Option<String>,

    /// Forward HTTP proxy URL
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,

    /// Per-question timeout (e.g. 10s, 500ms, 1m30s, 1.5s)
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Skip TLS certificate verification toward the DoH server
    #[arg(long)]
    insecure: bool,

    /// Forward the questions of one query concurrently
    #[arg(long)]
    parallel: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            listen_address: self.addr.clone(),
            doh_server: self.doh_server.clone(),
            proxy: self.proxy.clone(),
            query_timeout: self.timeout,
            insecure_tls: self.insecure,
            parallel_questions: self.parallel,
            log_level: self.log_level.clone(),
            debug: self.debug,
        }
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);
    bootstrap::log_startup_summary(&config);

    let dns_services = di::DnsServices::new(&config)?;

    server::start_dns_server(&config.server.listen_address, dns_services.handler).await?;

    info!("Server shutdown complete");
    Ok(())
}
