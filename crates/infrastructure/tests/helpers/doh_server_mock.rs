#![allow(dead_code)]
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// How the mock answers a question, keyed by the question's FQDN.
#[derive(Clone)]
pub enum MockReply {
    Answers(Vec<Record>),
    Status(u16, &'static str),
    Garbage(&'static [u8]),
    Delay(Duration, Box<MockReply>),
}

/// One request as seen by the mock.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub accept: Option<String>,
    pub host: Option<String>,
    pub query: Message,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<String, MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Deserialize)]
struct DnsParam {
    dns: String,
}

/// RFC 8484 GET endpoint at `/dns-query` over plain HTTP.
pub struct MockDohServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDohServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/dns-query", get(dns_query))
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn set_reply(&self, name: &str, reply: MockReply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(name.to_ascii_lowercase(), reply);
    }

    pub fn set_answers(&self, name: &str, answers: Vec<Record>) {
        self.set_reply(name, MockReply::Answers(answers));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn dns_query(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(param): Query<DnsParam>,
) -> Response {
    let Ok(wire) = URL_SAFE_NO_PAD.decode(param.dns.as_bytes()) else {
        return (StatusCode::BAD_REQUEST, "bad base64").into_response();
    };
    let Ok(query) = Message::from_vec(&wire) else {
        return (StatusCode::BAD_REQUEST, "bad dns message").into_response();
    };

    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        accept: header_value(header::ACCEPT),
        host: header_value(header::HOST),
        query: query.clone(),
    });

    let name = query
        .queries()
        .first()
        .map(|q| q.name().to_ascii().to_ascii_lowercase())
        .unwrap_or_default();
    let reply = state
        .replies
        .lock()
        .unwrap()
        .get(&name)
        .cloned()
        .unwrap_or(MockReply::Answers(vec![]));

    render(reply, &query).await
}

async fn render(mut reply: MockReply, query: &Message) -> Response {
    while let MockReply::Delay(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    match reply {
        MockReply::Answers(answers) => {
            let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
            response.set_recursion_desired(query.recursion_desired());
            response.set_recursion_available(true);
            response.add_queries(query.queries().iter().cloned());
            response.add_answers(answers);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/dns-message")],
                encode(&response),
            )
                .into_response()
        }
        MockReply::Status(code, body) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        MockReply::Garbage(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/dns-message")],
            bytes.to_vec(),
        )
            .into_response(),
        MockReply::Delay(..) => unreachable!(),
    }
}

fn encode(message: &Message) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

pub fn a_record(name: &str, ip: [u8; 4]) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::A(A(Ipv4Addr::from(ip))),
    )
}
