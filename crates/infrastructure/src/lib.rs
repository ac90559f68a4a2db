//! Ferrous DoH Infrastructure Layer
pub mod dns;
