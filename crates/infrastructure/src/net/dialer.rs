use async_trait::async_trait;
use ferrous_outbound_application::ports::{BoxedConnection, Dialer};
use ferrous_outbound_domain::{DialOptions, Destination, DomainError, Network};
use socket2::{Domain, Protocol, SockRef, Socket, TcpKeepalive, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, TcpSocket, UdpSocket};
use tracing::debug;

use super::{TcpConnection, UdpConnection};

/// Single-attempt dialer over the host network stack.
///
/// Domain destinations are resolved by the OS at dial time. When a source
/// address is given, only targets of the same IP family are considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDialer;

impl SystemDialer {
    pub fn new() -> Self {
        Self
    }

    async fn target_addr(
        &self,
        source: Option<IpAddr>,
        destination: &Destination,
    ) -> Result<SocketAddr, DomainError> {
        if let Some(addr) = destination.socket_addr() {
            return Ok(addr);
        }

        let host = destination.address.to_string();
        let candidates = lookup_host((host.as_str(), destination.port))
            .await
            .map_err(|e| dial_failed(destination, e))?;

        let resolved = candidates
            .into_iter()
            .find(|addr| source.is_none_or(|src| src.is_ipv4() == addr.is_ipv4()))
            .ok_or_else(|| DomainError::DialFailed {
                destination: destination.to_string(),
                reason: "no usable address".to_string(),
            });
        resolved
    }

    async fn connect_tcp(
        &self,
        source: Option<IpAddr>,
        target: SocketAddr,
        destination: &Destination,
        options: &DialOptions,
    ) -> Result<TcpConnection, DomainError> {
        let socket = if target.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| dial_failed(destination, e))?;

        if let Some(ip) = source {
            socket
                .bind(SocketAddr::new(ip, 0))
                .map_err(|e| dial_failed(destination, e))?;
        }

        let connect = socket.connect(target);
        let stream = match options.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                DomainError::DialTimeout {
                    destination: destination.to_string(),
                }
            })?,
            None => connect.await,
        }
        .map_err(|e| dial_failed(destination, e))?;

        stream
            .set_nodelay(options.tcp_nodelay)
            .map_err(|e| dial_failed(destination, e))?;

        if let Some(idle) = options.tcp_keepalive {
            SockRef::from(&stream)
                .set_tcp_keepalive(&TcpKeepalive::new().with_time(idle))
                .map_err(|e| dial_failed(destination, e))?;
        }

        debug!(
            destination = %destination,
            target = %target,
            local = ?stream.local_addr().ok(),
            "TCP connection established"
        );

        Ok(TcpConnection::new(stream))
    }

    async fn connect_udp(
        &self,
        source: Option<IpAddr>,
        target: SocketAddr,
        destination: &Destination,
    ) -> Result<UdpConnection, DomainError> {
        let socket = bind_udp(source, target).map_err(|e| dial_failed(destination, e))?;
        socket
            .connect(target)
            .await
            .map_err(|e| dial_failed(destination, e))?;

        debug!(destination = %destination, target = %target, "UDP socket connected");

        Ok(UdpConnection::new(socket))
    }
}

#[async_trait]
impl Dialer for SystemDialer {
    async fn dial(
        &self,
        source: Option<IpAddr>,
        destination: &Destination,
        options: &DialOptions,
    ) -> Result<BoxedConnection, DomainError> {
        let target = self.target_addr(source, destination).await?;

        match destination.network {
            Network::Tcp => {
                let connection = self
                    .connect_tcp(source, target, destination, options)
                    .await?;
                Ok(Box::new(connection))
            }
            Network::Udp => {
                let connection = self.connect_udp(source, target, destination).await?;
                Ok(Box::new(connection))
            }
        }
    }
}

fn bind_udp(source: Option<IpAddr>, target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, unspecified) = if target.is_ipv4() {
        (Domain::IPV4, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    } else {
        (Domain::IPV6, IpAddr::V6(Ipv6Addr::UNSPECIFIED))
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    let bind_addr = SocketAddr::new(source.unwrap_or(unspecified), 0);
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

fn dial_failed(destination: &Destination, error: io::Error) -> DomainError {
    DomainError::DialFailed {
        destination: destination.to_string(),
        reason: error.to_string(),
    }
}
