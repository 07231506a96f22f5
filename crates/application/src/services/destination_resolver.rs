use ferrous_outbound_domain::Destination;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{DispatchLog, NameLookup};

/// Turns domain destinations into IP destinations for the `use_ip` strategy.
pub struct DestinationResolver {
    lookup: Arc<dyn NameLookup>,
    log: Arc<dyn DispatchLog>,
}

impl DestinationResolver {
    pub fn new(lookup: Arc<dyn NameLookup>, log: Arc<dyn DispatchLog>) -> Self {
        Self { lookup, log }
    }

    /// Resolves `destination` to one of its addresses, picked at random.
    ///
    /// IP destinations come back unchanged without a lookup. A lookup that
    /// fails or answers with nothing also leaves the destination unchanged, so
    /// the dialer gets the chance to handle the domain itself.
    #[instrument(skip(self, destination), fields(destination = %destination))]
    pub async fn resolve(&self, destination: &Destination) -> Destination {
        let Some(domain) = destination.address.domain() else {
            return destination.clone();
        };

        let ips = match self.lookup.lookup(domain).await {
            Ok(ips) => ips,
            Err(e) => {
                self.log.warn(&format!(
                    "Name lookup for {} failed: {}. Keep domain as is.",
                    domain, e
                ));
                return destination.clone();
            }
        };

        if ips.is_empty() {
            self.log.info(&format!(
                "DNS returns no answer for {}. Keep domain as is.",
                domain
            ));
            return destination.clone();
        }

        let ip = ips[fastrand::usize(..ips.len())];
        let resolved = destination.with_address(ip);
        self.log.info(&format!(
            "Changing destination from {} to {}",
            destination, resolved
        ));
        resolved
    }
}
