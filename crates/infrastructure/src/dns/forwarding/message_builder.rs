//! DNS Message Builder
//!
//! Constructs the single-question sub-queries sent upstream over DoH and
//! serializes messages to wire format using `hickory-proto`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ferrous_doh_application::ports::DohQuestion;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Transaction ID carried by every upstream DoH request (RFC 8484 §4.1).
pub const DOH_QUERY_ID: u16 = 0;

/// Builds DoH sub-queries in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build the sub-query for one question
    ///
    /// Creates a standard query with:
    /// - ID 0, so identical questions produce identical bytes for HTTP caches
    /// - RD flag copied from the client query
    /// - Exactly one question section
    pub fn build_sub_query(question: &DohQuestion) -> Message {
        let mut message = Message::new(DOH_QUERY_ID, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(question.recursion_desired);
        message.add_query(question.question.clone());
        message
    }

    /// Build the sub-query and serialize it to wire format bytes
    pub fn build_sub_query_bytes(question: &DohQuestion) -> Result<Vec<u8>, DomainError> {
        Self::serialize_message(&Self::build_sub_query(question))
    }

    /// Value of the `dns` GET parameter: unpadded base64url of the wire bytes
    pub fn encode_dns_param(wire: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(wire)
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;

        Ok(buf)
    }
}
