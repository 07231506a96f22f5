use async_trait::async_trait;
use ferrous_outbound_application::ports::NameLookup;
use ferrous_outbound_domain::DomainError;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

/// Name lookup through the operating system resolver (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNameLookup;

impl SystemNameLookup {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NameLookup for SystemNameLookup {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        let addrs = lookup_host((domain, 0))
            .await
            .map_err(|e| DomainError::LookupFailed {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }

        debug!(domain = %domain, answers = ips.len(), "System lookup finished");
        Ok(ips)
    }
}
