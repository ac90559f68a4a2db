pub mod forwarding;
pub mod server;
pub mod translator;
pub mod transport;

pub use server::DnsServerHandler;
pub use translator::HttpsDohTranslator;
