use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::HttpsTransport;
use async_trait::async_trait;
use ferrous_doh_application::ports::{DohQuestion, DohTranslator};
use ferrous_doh_domain::DomainError;
use hickory_proto::rr::Record;
use std::time::Duration;
use tracing::debug;

/// Resolves one question with a single RFC 8484 GET.
pub struct HttpsDohTranslator {
    transport: HttpsTransport,
}

impl HttpsDohTranslator {
    pub fn new(transport: HttpsTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DohTranslator for HttpsDohTranslator {
    async fn translate(
        &self,
        question: &DohQuestion,
        timeout: Duration,
    ) -> Result<Vec<Record>, DomainError> {
        let wire = MessageBuilder::build_sub_query_bytes(question)?;
        let param = MessageBuilder::encode_dns_param(&wire);

        let body = self.transport.get(&param, timeout).await?;
        let answers = ResponseParser::parse_answers(&body, question.original_id)?;

        debug!(
            name = %question.question.name(),
            record_type = %question.question.query_type(),
            answers = answers.len(),
            "DoH translation complete"
        );

        Ok(answers)
    }

    fn server(&self) -> &str {
        self.transport.server()
    }
}
