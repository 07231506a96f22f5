use bytes::Bytes;
use ferrous_outbound_domain::{
    Destination, DomainError, DomainStrategy, OutboundConfig, OutboundMeta, SessionPhase,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::ports::{Dialer, DispatchLog, NameLookup, StreamPair};
use crate::services::{
    effective_timeout, DestinationResolver, DuplexRelay, RetryPolicy, RetryingDialer,
};

/// Capabilities a dispatcher is built from.
pub struct DispatchDeps {
    pub dialer: Arc<dyn Dialer>,
    /// Required only for [`DomainStrategy::UseIp`].
    pub name_lookup: Option<Arc<dyn NameLookup>>,
    pub log: Arc<dyn DispatchLog>,
}

/// Direct outbound: resolve, dial, then relay one session at a time per call.
pub struct OutboundDispatcher {
    domain_strategy: DomainStrategy,
    timeout_secs: u32,
    meta: OutboundMeta,
    resolver: Option<DestinationResolver>,
    dialer: RetryingDialer,
    log: Arc<dyn DispatchLog>,
    shutdown: CancellationToken,
}

impl OutboundDispatcher {
    pub fn new(
        config: &OutboundConfig,
        meta: OutboundMeta,
        deps: DispatchDeps,
    ) -> Result<Self, DomainError> {
        let resolver = if config.domain_strategy.requires_lookup() {
            let lookup = deps.name_lookup.ok_or(DomainError::MissingNameLookup)?;
            Some(DestinationResolver::new(lookup, Arc::clone(&deps.log)))
        } else {
            None
        };

        let dialer = RetryingDialer::new(
            deps.dialer,
            RetryPolicy::from(&config.retry),
            Arc::clone(&deps.log),
        );

        Ok(Self {
            domain_strategy: config.domain_strategy,
            timeout_secs: config.timeout,
            meta,
            resolver,
            dialer,
            log: deps.log,
            shutdown: CancellationToken::new(),
        })
    }

    /// Cancelling `token` aborts every in-flight session of this dispatcher.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn domain_strategy(&self) -> DomainStrategy {
        self.domain_strategy
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn tag(&self) -> &str {
        &self.meta.tag
    }

    /// Runs one session to completion. Failures are logged, never returned;
    /// `payload` and both streams are released on every path.
    #[instrument(
        skip(self, destination, payload, streams),
        fields(outbound = %self.meta.tag, destination = %destination)
    )]
    pub async fn dispatch(&self, destination: Destination, payload: Bytes, streams: StreamPair) {
        self.log
            .info(&format!("Opening connection to {}", destination));

        let last = self.run_session(destination, payload, streams).await;
        self.transition(last, SessionPhase::Closed);
    }

    async fn run_session(
        &self,
        destination: Destination,
        payload: Bytes,
        streams: StreamPair,
    ) -> SessionPhase {
        let mut phase = SessionPhase::Created;

        let destination = match &self.resolver {
            Some(resolver) if destination.family().is_domain() => {
                phase = self.transition(phase, SessionPhase::Resolving);
                resolver.resolve(&destination).await
            }
            _ => destination,
        };

        if self.shutdown.is_cancelled() {
            self.log.debug(&format!(
                "Dispatcher shutting down, not dialing {}",
                destination
            ));
            return phase;
        }

        phase = self.transition(phase, SessionPhase::Dialing);
        let connection = match self
            .dialer
            .dial(
                self.meta.send_through,
                &destination,
                &self.meta.dial_options,
            )
            .await
        {
            Ok(connection) => connection,
            Err(e) => {
                self.log.warn(&format!(
                    "Failed to open connection to {}: {}",
                    destination, e
                ));
                return phase;
            }
        };

        phase = self.transition(phase, SessionPhase::Transporting);
        let idle_timeout = effective_timeout(destination.network, self.timeout_secs);
        let relay = DuplexRelay::new(destination.clone(), idle_timeout, Arc::clone(&self.log))
            .with_cancellation(self.shutdown.clone());
        let report = relay.run(connection, streams, payload).await;

        self.log.debug(&format!(
            "Session to {} finished: uplink {:?} ({} bytes), downlink {:?} ({} bytes)",
            destination, report.uplink, report.bytes_up, report.downlink, report.bytes_down
        ));
        phase
    }

    fn transition(&self, from: SessionPhase, to: SessionPhase) -> SessionPhase {
        debug_assert!(to > from, "session phase moved backwards: {} -> {}", from, to);
        self.log
            .debug(&format!("[{}] session {} -> {}", self.meta.tag, from, to));
        to
    }
}
