use thiserror::Error;

/// Longest upstream body excerpt carried in `UpstreamStatus`.
pub const MAX_BODY_SNIPPET: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Failed to encode DNS query: {0}")]
    EncodeFailed(String),

    #[error("Timeout waiting for DoH response from {server}")]
    UpstreamTimeout { server: String },

    #[error("DoH request to {server} failed: {reason}")]
    UpstreamRequestFailed { server: String, reason: String },

    #[error("DoH server {server} returned HTTP {status}: {body}")]
    UpstreamStatus {
        server: String,
        status: u16,
        body: String,
    },

    #[error("Invalid DNS response: {0}")]
    DecodeFailed(String),

    #[error("Failed to write DNS reply: {0}")]
    WriteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Short label used as the `category` field in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EncodeFailed(_) => "encode",
            Self::UpstreamTimeout { .. }
            | Self::UpstreamRequestFailed { .. }
            | Self::UpstreamStatus { .. } => "upstream",
            Self::DecodeFailed(_) => "decode",
            Self::WriteFailed(_) => "write",
            Self::ConfigError(_) => "config",
        }
    }

    pub fn is_upstream(&self) -> bool {
        self.category() == "upstream"
    }

    /// Builds an `UpstreamStatus` error, cutting the body down to
    /// [`MAX_BODY_SNIPPET`] bytes on a char boundary.
    pub fn upstream_status(server: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let mut end = text.len().min(MAX_BODY_SNIPPET);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self::UpstreamStatus {
            server: server.into(),
            status,
            body: text[..end].trim().to_string(),
        }
    }
}
