use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

use crate::outbound_meta::{DialOptions, OutboundMeta};

/// Idle timeout applied to UDP downlinks regardless of the configured value.
pub const DEFAULT_UDP_TIMEOUT_SECS: u32 = 16;

/// Whether domain destinations are resolved to an IP before dialing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStrategy {
    #[default]
    AsIs,
    #[serde(alias = "resolve_to_ip")]
    UseIp,
}

impl DomainStrategy {
    pub fn requires_lookup(&self) -> bool {
        matches!(self, DomainStrategy::UseIp)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutboundConfig {
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default)]
    pub domain_strategy: DomainStrategy,

    /// Downlink idle timeout in seconds for TCP sessions; 0 disables it.
    #[serde(default = "default_timeout")]
    pub timeout: u32,

    #[serde(default)]
    pub send_through: Option<IpAddr>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_true")]
    pub tcp_nodelay: bool,

    #[serde(default)]
    pub tcp_keepalive_secs: Option<u64>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl OutboundConfig {
    pub fn dial_options(&self) -> DialOptions {
        DialOptions {
            connect_timeout: (self.connect_timeout_ms > 0)
                .then(|| Duration::from_millis(self.connect_timeout_ms)),
            tcp_nodelay: self.tcp_nodelay,
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
        }
    }

    pub fn meta(&self) -> OutboundMeta {
        OutboundMeta {
            tag: self.tag.as_str().into(),
            send_through: self.send_through,
            dial_options: self.dial_options(),
        }
    }
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            domain_strategy: DomainStrategy::default(),
            timeout: default_timeout(),
            send_through: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            tcp_nodelay: true,
            tcp_keepalive_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

fn default_tag() -> String {
    "direct".to_string()
}

fn default_timeout() -> u32 {
    300
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_multiplier() -> u32 {
    2
}

fn default_true() -> bool {
    true
}
