use async_trait::async_trait;
use ferrous_doh_application::ports::{DohQuestion, DohTranslator};
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Behavior {
    Answer(Vec<Record>),
    Fail(DomainError),
    Delay(Duration, Vec<Record>),
}

/// Scripted translator keyed by question name (FQDN with trailing dot).
#[derive(Clone)]
pub struct MockDohTranslator {
    behaviors: Arc<Mutex<HashMap<String, Behavior>>>,
    calls: Arc<Mutex<Vec<DohQuestion>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockDohTranslator {
    pub fn new() -> Self {
        Self {
            behaviors: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_answers(&self, name: &str, records: Vec<Record>) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(name.to_string(), Behavior::Answer(records));
    }

    pub fn set_error(&self, name: &str, error: DomainError) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(name.to_string(), Behavior::Fail(error));
    }

    pub fn set_delayed_answers(&self, name: &str, delay: Duration, records: Vec<Record>) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(name.to_string(), Behavior::Delay(delay, records));
    }

    pub fn calls(&self) -> Vec<DohQuestion> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockDohTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DohTranslator for MockDohTranslator {
    async fn translate(
        &self,
        question: &DohQuestion,
        _timeout: Duration,
    ) -> Result<Vec<Record>, DomainError> {
        self.calls.lock().unwrap().push(question.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&question.question.name().to_ascii())
            .cloned();

        let result = match behavior {
            Some(Behavior::Answer(records)) => {
                tokio::task::yield_now().await;
                Ok(records)
            }
            Some(Behavior::Fail(error)) => Err(error),
            Some(Behavior::Delay(delay, records)) => {
                tokio::time::sleep(delay).await;
                Ok(records)
            }
            None => Err(DomainError::UpstreamRequestFailed {
                server: self.server().to_string(),
                reason: "no scripted response".to_string(),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn server(&self) -> &str {
        "mock.doh.test"
    }
}

pub fn a_record(name: &str, ip: [u8; 4]) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::A(A(Ipv4Addr::from(ip))),
    )
}

pub fn query_message(id: u16, questions: &[(&str, RecordType)]) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    for (name, record_type) in questions {
        message.add_query(Query::query(Name::from_str(name).unwrap(), *record_type));
    }
    message
}
