//! Ferrous Outbound Domain Layer
pub mod config;
pub mod destination;
pub mod errors;
pub mod outbound_meta;
pub mod session;

pub use config::{
    CliOverrides, Config, ConfigError, DnsConfig, DomainStrategy, OutboundConfig, RetryConfig,
    DEFAULT_UDP_TIMEOUT_SECS,
};
pub use destination::{Address, AddressFamily, Destination, Network};
pub use errors::DomainError;
pub use outbound_meta::{DialOptions, OutboundMeta};
pub use session::SessionPhase;
