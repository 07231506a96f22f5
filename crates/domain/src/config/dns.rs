use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Static answers consulted before the system resolver.
    #[serde(default)]
    pub hosts: HashMap<String, Vec<IpAddr>>,

    #[serde(default = "default_true")]
    pub use_system: bool,
}

impl DnsConfig {
    /// Whether any name lookup capability can be built from this section.
    pub fn has_lookup(&self) -> bool {
        self.use_system || !self.hosts.is_empty()
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            hosts: HashMap::new(),
            use_system: true,
        }
    }
}

fn default_true() -> bool {
    true
}
