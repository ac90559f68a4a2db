use crate::ports::{DohQuestion, DohTranslator};
use ferrous_doh_domain::DomainError;
use futures::future::join_all;
use hickory_proto::op::{Message, MessageType, Query};
use hickory_proto::rr::Record;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Forwards every question of a client query to the DoH translator and
/// assembles a single authoritative reply.
pub struct ForwardQueryUseCase {
    translator: Arc<dyn DohTranslator>,
    timeout: Duration,
    parallel: bool,
}

impl ForwardQueryUseCase {
    pub fn new(translator: Arc<dyn DohTranslator>, timeout: Duration) -> Self {
        Self {
            translator,
            timeout,
            parallel: false,
        }
    }

    /// Dispatch all questions of a query at once. Answer order still follows
    /// question order.
    pub fn with_parallel_questions(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Always yields exactly one reply; failed questions only contribute no
    /// answers.
    pub async fn execute(&self, request: &Message) -> Message {
        let mut reply = build_reply(request);
        let questions = request.queries();

        let mut answered = 0usize;
        if self.parallel && questions.len() > 1 {
            let lookups = questions.iter().map(|q| self.forward_question(request, q));
            for records in join_all(lookups).await.into_iter().flatten() {
                answered += 1;
                reply.add_answers(records);
            }
        } else {
            for question in questions {
                if let Some(records) = self.forward_question(request, question).await {
                    answered += 1;
                    reply.add_answers(records);
                }
            }
        }

        debug!(
            id = request.id(),
            questions = questions.len(),
            answered,
            failed = questions.len() - answered,
            answers = reply.answers().len(),
            "Reply assembled"
        );

        reply
    }

    async fn forward_question(&self, request: &Message, question: &Query) -> Option<Vec<Record>> {
        let doh_question = DohQuestion::from_request(request, question);

        debug!(
            name = %question.name(),
            record_type = %question.query_type(),
            server = self.translator.server(),
            "Forwarding question"
        );

        // Each question gets its own window, measured from here.
        let result = match tokio::time::timeout(
            self.timeout,
            self.translator.translate(&doh_question, self.timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::UpstreamTimeout {
                server: self.translator.server().to_string(),
            }),
        };

        match result {
            Ok(records) => {
                debug!(
                    name = %question.name(),
                    answers = records.len(),
                    "Question answered"
                );
                Some(records)
            }
            Err(e) => {
                warn!(
                    name = %question.name(),
                    record_type = %question.query_type(),
                    category = e.category(),
                    error = %e,
                    "Question failed, continuing without answers"
                );
                None
            }
        }
    }
}

/// Reply skeleton for `request`: same ID, op code, RD/CD bits and question
/// section, Authoritative set, no answers yet.
pub fn build_reply(request: &Message) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_checking_disabled(request.checking_disabled());
    reply.set_authoritative(true);
    reply.add_queries(request.queries().iter().cloned());
    reply
}
