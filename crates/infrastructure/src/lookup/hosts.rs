use async_trait::async_trait;
use ferrous_outbound_application::ports::NameLookup;
use ferrous_outbound_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Answers from a static host table, deferring unknown names to an optional
/// fallback lookup.
pub struct StaticHostsLookup {
    hosts: HashMap<String, Vec<IpAddr>>,
    fallback: Option<Arc<dyn NameLookup>>,
}

impl StaticHostsLookup {
    pub fn new(hosts: &HashMap<String, Vec<IpAddr>>) -> Self {
        let hosts = hosts
            .iter()
            .map(|(domain, ips)| (normalize(domain), ips.clone()))
            .collect();
        Self {
            hosts,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn NameLookup>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

fn normalize(domain: &str) -> String {
    domain.trim_end_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl NameLookup for StaticHostsLookup {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        if let Some(ips) = self.hosts.get(&normalize(domain)) {
            if !ips.is_empty() {
                debug!(domain = %domain, answers = ips.len(), "Static hosts hit");
                return Ok(ips.clone());
            }
        }

        match &self.fallback {
            Some(fallback) => fallback.lookup(domain).await,
            None => Ok(Vec::new()),
        }
    }
}
