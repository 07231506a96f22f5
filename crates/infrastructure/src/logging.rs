use ferrous_outbound_application::ports::DispatchLog;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Forwards dispatcher messages to `tracing`, tagged with the outbound name.
pub struct TracingDispatchLog {
    tag: Arc<str>,
}

impl TracingDispatchLog {
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl DispatchLog for TracingDispatchLog {
    fn debug(&self, message: &str) {
        debug!(outbound = %self.tag, "{}", message);
    }

    fn info(&self, message: &str) {
        info!(outbound = %self.tag, "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(outbound = %self.tag, "{}", message);
    }
}
