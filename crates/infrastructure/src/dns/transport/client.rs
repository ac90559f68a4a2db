use ferrous_doh_domain::{DomainError, UpstreamConfig};
use reqwest::{Client, Proxy};
use tracing::{info, warn};

/// Build the HTTP client shared by every DoH request.
///
/// Environment proxy variables are honored unless `upstream.proxy` is set,
/// in which case all requests go through it.
pub fn build_http_client(upstream: &UpstreamConfig) -> Result<Client, DomainError> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(4);

    if let Some(proxy_url) = upstream.proxy.as_deref() {
        let proxy = Proxy::all(proxy_url).map_err(|e| {
            DomainError::ConfigError(format!("bad proxy url '{}': {}", proxy_url, e))
        })?;
        info!(proxy = %proxy_url, "Routing DoH requests through proxy");
        builder = builder.proxy(proxy);
    }

    if upstream.insecure_tls {
        warn!("TLS certificate verification is DISABLED for the DoH upstream");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| DomainError::ConfigError(format!("failed to build HTTP client: {}", e)))
}
