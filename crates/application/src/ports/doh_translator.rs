use async_trait::async_trait;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, Query};
use hickory_proto::rr::Record;
use std::time::Duration;

/// One question lifted out of a client query, plus the bits of the client's
/// header the upstream round trip needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DohQuestion {
    pub question: Query,
    /// Client transaction ID, restored on the decoded DoH response.
    pub original_id: u16,
    pub recursion_desired: bool,
}

impl DohQuestion {
    pub fn new(question: Query, original_id: u16) -> Self {
        Self {
            question,
            original_id,
            recursion_desired: true,
        }
    }

    pub fn from_request(request: &Message, question: &Query) -> Self {
        Self {
            question: question.clone(),
            original_id: request.id(),
            recursion_desired: request.recursion_desired(),
        }
    }
}

/// Port for resolving a single question against a DoH resolver.
#[async_trait]
pub trait DohTranslator: Send + Sync {
    /// Resolve one question, returning the answer section of the upstream
    /// response. `timeout` bounds the whole round trip.
    async fn translate(
        &self,
        question: &DohQuestion,
        timeout: Duration,
    ) -> Result<Vec<Record>, DomainError>;

    /// Upstream identity used in logs and timeout errors.
    fn server(&self) -> &str;
}
