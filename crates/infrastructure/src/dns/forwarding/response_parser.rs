use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decode a DoH response body and hand it back under the client's
    /// transaction ID.
    pub fn parse(response_bytes: &[u8], original_id: u16) -> Result<Message, DomainError> {
        let mut message = Message::from_vec(response_bytes)
            .map_err(|e| DomainError::DecodeFailed(e.to_string()))?;

        let mut header = *message.header();
        header.set_id(original_id);
        message.set_header(header);

        debug!(
            id = original_id,
            rcode = ?message.response_code(),
            truncated = message.truncated(),
            answers = message.answers().len(),
            "DoH response parsed"
        );

        Ok(message)
    }

    /// Decode a DoH response body and keep only its answer records.
    pub fn parse_answers(response_bytes: &[u8], original_id: u16) -> Result<Vec<Record>, DomainError> {
        let mut message = Self::parse(response_bytes, original_id)?;
        Ok(message.take_answers())
    }
}
