pub mod client;
pub mod https;

pub use client::build_http_client;
pub use https::HttpsTransport;
