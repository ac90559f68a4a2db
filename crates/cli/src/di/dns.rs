use ferrous_doh_application::use_cases::ForwardQueryUseCase;
use ferrous_doh_domain::Config;
use ferrous_doh_infrastructure::dns::transport::{build_http_client, HttpsTransport};
use ferrous_doh_infrastructure::dns::{DnsServerHandler, HttpsDohTranslator};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub forward_use_case: Arc<ForwardQueryUseCase>,
    pub handler: Arc<DnsServerHandler>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let upstream = &config.upstream;

        let client = build_http_client(upstream)?;
        let transport = HttpsTransport::new(client, &upstream.doh_server);
        info!(url = %transport.url(), "DoH transport ready");

        let translator = Arc::new(HttpsDohTranslator::new(transport));
        let forward_use_case = Arc::new(
            ForwardQueryUseCase::new(translator, upstream.query_timeout())
                .with_parallel_questions(upstream.parallel_questions),
        );
        let handler = Arc::new(DnsServerHandler::new(forward_use_case.clone()));

        Ok(Self {
            forward_use_case,
            handler,
        })
    }
}
