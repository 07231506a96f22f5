pub mod dns;
pub mod errors;
pub mod logging;
pub mod outbound;
pub mod root;
pub mod server;

pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use outbound::{DomainStrategy, OutboundConfig, RetryConfig, DEFAULT_UDP_TIMEOUT_SECS};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
