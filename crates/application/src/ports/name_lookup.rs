use async_trait::async_trait;
use ferrous_outbound_domain::DomainError;
use std::net::IpAddr;

/// Resolves a domain to the set of addresses it currently answers with.
/// An empty answer is not an error.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError>;
}
