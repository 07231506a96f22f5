use ferrous_outbound_domain::{DomainError, Network, OutboundConfig, OutboundMeta};
use std::sync::Arc;

use super::outbound_dispatcher::{DispatchDeps, OutboundDispatcher};
use crate::ports::{Dialer, DispatchLog, NameLookup};

/// Builds direct outbound dispatchers from configuration. The composing
/// application owns the factory and calls it explicitly.
#[derive(Clone)]
pub struct DirectOutboundFactory {
    dialer: Arc<dyn Dialer>,
    name_lookup: Option<Arc<dyn NameLookup>>,
    log: Arc<dyn DispatchLog>,
}

impl DirectOutboundFactory {
    pub fn new(dialer: Arc<dyn Dialer>, log: Arc<dyn DispatchLog>) -> Self {
        Self {
            dialer,
            name_lookup: None,
            log,
        }
    }

    pub fn with_name_lookup(mut self, lookup: Arc<dyn NameLookup>) -> Self {
        self.name_lookup = Some(lookup);
        self
    }

    /// Stream transports the created dispatchers can carry.
    pub fn stream_capability(&self) -> &'static [Network] {
        &[Network::Tcp]
    }

    pub fn create(
        &self,
        config: &OutboundConfig,
        meta: OutboundMeta,
    ) -> Result<OutboundDispatcher, DomainError> {
        OutboundDispatcher::new(
            config,
            meta,
            DispatchDeps {
                dialer: Arc::clone(&self.dialer),
                name_lookup: self.name_lookup.clone(),
                log: Arc::clone(&self.log),
            },
        )
    }
}
