use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;

/// Where and how DoH requests are sent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Bare DoH hostname (optionally `host:port`); requests go to
    /// `https://<doh_server>/dns-query`.
    #[serde(default = "default_doh_server")]
    pub doh_server: String,

    /// Forward HTTP proxy URL, e.g. `http://127.0.0.1:3128`.
    #[serde(default)]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification toward the DoH server.
    /// Independent of `proxy`; must be switched on explicitly.
    #[serde(default)]
    pub insecure_tls: bool,

    /// Per-question deadline in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Dispatch the questions of one query concurrently instead of one by one.
    #[serde(default)]
    pub parallel_questions: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            doh_server: default_doh_server(),
            proxy: None,
            insecure_tls: false,
            query_timeout_ms: default_query_timeout_ms(),
            parallel_questions: false,
        }
    }
}

impl UpstreamConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn doh_url(&self) -> String {
        format!("https://{}/dns-query", self.doh_server)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let server = self.doh_server.trim();
        if server.is_empty() {
            return Err(ConfigError::Validation(
                "DoH server cannot be empty".to_string(),
            ));
        }
        if server.contains("://") || server.contains('/') {
            return Err(ConfigError::Validation(format!(
                "DoH server '{}' must be a hostname without scheme or path",
                server
            )));
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }
        if let Some(proxy) = &self.proxy {
            if proxy.trim().is_empty() {
                return Err(ConfigError::Validation("Proxy URL is empty".to_string()));
            }
        }
        Ok(())
    }
}

fn default_doh_server() -> String {
    "mozilla.cloudflare-dns.com".to_string()
}

fn default_query_timeout_ms() -> u64 {
    10_000
}
