use crate::dns::forwarding::MessageBuilder;
use ferrous_doh_application::use_cases::ForwardQueryUseCase;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

const HEADER_LEN: usize = 12;

/// Turns raw client datagrams into raw reply datagrams.
pub struct DnsServerHandler {
    use_case: Arc<ForwardQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ForwardQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Returns `None` when nothing should be sent back: responses arriving on
    /// the listener, and datagrams too short to carry an ID. Op codes other
    /// than QUERY get NOTIMP without touching the upstream.
    pub async fn handle_raw_udp(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let request = match Message::from_vec(datagram) {
            Ok(message) => message,
            Err(e) => {
                warn!(len = datagram.len(), error = %e, "Malformed DNS datagram");
                return error_reply_from_raw(datagram, ResponseCode::FormErr);
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(id = request.id(), "Ignoring non-query message");
            return None;
        }

        if request.op_code() != OpCode::Query {
            debug!(id = request.id(), op_code = ?request.op_code(), "Unsupported op code");
            return Some(encode_or_servfail(&not_implemented_reply(&request), request.id()));
        }

        debug!(
            id = request.id(),
            questions = request.queries().len(),
            "DNS query received"
        );

        let reply = self.use_case.execute(&request).await;
        Some(encode_or_servfail(&reply, request.id()))
    }
}

/// NOTIMP reply echoing the request header and questions.
fn not_implemented_reply(request: &Message) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_response_code(ResponseCode::NotImp);
    reply.add_queries(request.queries().iter().cloned());
    reply
}

fn encode_or_servfail(reply: &Message, id: u16) -> Vec<u8> {
    match MessageBuilder::serialize_message(reply) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(id, category = e.category(), error = %e, "Failed to encode reply");
            header_only_reply(id, ResponseCode::ServFail)
        }
    }
}

/// Header-only error reply echoing the datagram's ID, if it has one.
fn error_reply_from_raw(datagram: &[u8], code: ResponseCode) -> Option<Vec<u8>> {
    if datagram.len() < 2 {
        return None;
    }
    let id = u16::from_be_bytes([datagram[0], datagram[1]]);
    Some(header_only_reply(id, code))
}

fn header_only_reply(id: u16, code: ResponseCode) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN];
    buf[0] = (id >> 8) as u8;
    buf[1] = id as u8;
    buf[2] = 0x80;
    buf[3] = u16::from(code) as u8 & 0x0F;
    buf
}
