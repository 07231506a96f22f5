use async_trait::async_trait;
use ferrous_outbound_domain::{DialOptions, Destination, DomainError, Network};
use std::net::IpAddr;
use tokio::io::{AsyncRead, AsyncWrite};

/// A raw outbound connection. Dropping it closes the connection; for TCP,
/// `AsyncWrite::poll_shutdown` closes only the write direction.
pub trait Connection: AsyncRead + AsyncWrite + Send + Unpin {
    fn network(&self) -> Network;
}

pub type BoxedConnection = Box<dyn Connection>;

/// Single-attempt dial primitive.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(
        &self,
        source: Option<IpAddr>,
        destination: &Destination,
        options: &DialOptions,
    ) -> Result<BoxedConnection, DomainError>;
}
