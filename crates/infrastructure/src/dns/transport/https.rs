//! HTTPS transport for DNS-over-HTTPS (RFC 8484), GET form
//!
//! The wire-format query travels base64url-encoded (no padding) in the `dns`
//! query parameter; the response body is the raw DNS wire format response.
//!
//! Wire format (HTTP):
//! ```text
//! GET /dns-query?dns=AAABAAABAAAAAAAAA3d3dwdleGFtcGxlA2NvbQAAAQAB HTTP/2
//! Accept: application/dns-message
//! ```

use bytes::Bytes;
use ferrous_doh_domain::DomainError;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Media type for DNS-over-HTTPS requests and responses (RFC 8484 §6)
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// DNS-over-HTTPS transport (RFC 8484)
#[derive(Clone)]
pub struct HttpsTransport {
    client: reqwest::Client,
    url: String,
    server: String,
}

impl HttpsTransport {
    /// Transport for `https://<doh_server>/dns-query`.
    pub fn new(client: reqwest::Client, doh_server: &str) -> Self {
        Self {
            client,
            url: format!("https://{}/dns-query", doh_server),
            server: doh_server.to_string(),
        }
    }

    /// Transport for an explicit endpoint URL.
    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client,
            server: url.clone(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// One GET round trip. `timeout` is the reqwest per-request deadline and
    /// covers sending, headers and the body.
    ///
    /// The response is owned by this call and dropped before it returns, on
    /// every exit path.
    pub async fn get(&self, dns_param: &str, timeout: Duration) -> Result<Bytes, DomainError> {
        let request_url = format!("{}?dns={}", self.url, dns_param);

        debug!(
            url = %self.url,
            param_len = dns_param.len(),
            "Sending DoH query"
        );

        self.round_trip(&request_url, timeout).await
    }

    async fn round_trip(&self, request_url: &str, timeout: Duration) -> Result<Bytes, DomainError> {
        let response = self
            .client
            .get(request_url)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.request_error(e))?;

        if status != StatusCode::OK {
            return Err(DomainError::upstream_status(
                self.server.clone(),
                status.as_u16(),
                &body,
            ));
        }

        debug!(
            url = %self.url,
            response_len = body.len(),
            "DoH response received"
        );

        Ok(body)
    }

    fn request_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::UpstreamTimeout {
                server: self.server.clone(),
            }
        } else {
            DomainError::UpstreamRequestFailed {
                server: self.server.clone(),
                reason: e.to_string(),
            }
        }
    }
}
