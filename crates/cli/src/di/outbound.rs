use ferrous_outbound_application::ports::{DispatchLog, NameLookup};
use ferrous_outbound_application::use_cases::{DirectOutboundFactory, OutboundDispatcher};
use ferrous_outbound_domain::{Config, DnsConfig};
use ferrous_outbound_infrastructure::logging::TracingDispatchLog;
use ferrous_outbound_infrastructure::lookup::{StaticHostsLookup, SystemNameLookup};
use ferrous_outbound_infrastructure::net::SystemDialer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct OutboundServices {
    pub dispatcher: Arc<OutboundDispatcher>,
}

impl OutboundServices {
    pub fn new(config: &Config, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let outbound = &config.outbound;
        let log: Arc<dyn DispatchLog> = Arc::new(TracingDispatchLog::new(outbound.tag.as_str()));

        let mut factory = DirectOutboundFactory::new(Arc::new(SystemDialer::new()), log);
        if let Some(lookup) = Self::build_name_lookup(&config.dns) {
            factory = factory.with_name_lookup(lookup);
        }

        let dispatcher = factory
            .create(outbound, outbound.meta())?
            .with_cancellation(shutdown);

        info!(
            tag = %outbound.tag,
            domain_strategy = ?outbound.domain_strategy,
            timeout_secs = outbound.timeout,
            streams = ?factory.stream_capability(),
            "Outbound dispatcher ready"
        );

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
        })
    }

    fn build_name_lookup(dns: &DnsConfig) -> Option<Arc<dyn NameLookup>> {
        let system = dns
            .use_system
            .then(|| Arc::new(SystemNameLookup::new()) as Arc<dyn NameLookup>);

        if dns.hosts.is_empty() {
            return system;
        }

        let mut hosts = StaticHostsLookup::new(&dns.hosts);
        if let Some(system) = system {
            hosts = hosts.with_fallback(system);
        }
        info!(entries = hosts.len(), "Static hosts loaded");
        let hosts: Arc<dyn NameLookup> = Arc::new(hosts);
        Some(hosts)
    }
}
