use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

/// Transport network a destination is reached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Udp,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Udp => "udp",
        }
    }

    /// Whether connections over this network support shutting down only the
    /// write direction.
    pub fn supports_half_close(&self) -> bool {
        matches!(self, Network::Tcp)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Domain,
}

impl AddressFamily {
    pub fn is_domain(&self) -> bool {
        matches!(self, AddressFamily::Domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Domain(Arc<str>),
}

impl Address {
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::Ipv4(_) => AddressFamily::Ipv4,
            Address::Ipv6(_) => AddressFamily::Ipv6,
            Address::Domain(_) => AddressFamily::Domain,
        }
    }

    pub fn domain(&self) -> Option<&str> {
        match self {
            Address::Domain(domain) => Some(domain),
            _ => None,
        }
    }

    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Address::Ipv4(ip) => Some(IpAddr::V4(*ip)),
            Address::Ipv6(ip) => Some(IpAddr::V6(*ip)),
            Address::Domain(_) => None,
        }
    }

    /// Parses an IP literal into an IP address, anything else into a domain.
    pub fn parse(host: &str) -> Result<Self, DomainError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(DomainError::InvalidDestination("empty host".to_string()));
        }
        let unbracketed = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        match unbracketed.parse::<IpAddr>() {
            Ok(ip) => Ok(Address::from(ip)),
            Err(_) if unbracketed.contains(|c: char| c.is_whitespace() || c == '/') => Err(
                DomainError::InvalidDestination(format!("invalid host '{}'", host)),
            ),
            Err(_) => Ok(Address::Domain(unbracketed.into())),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Address::Ipv4(v4),
            IpAddr::V6(v6) => Address::Ipv6(v6),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ipv4(ip) => write!(f, "{}", ip),
            Address::Ipv6(ip) => write!(f, "[{}]", ip),
            Address::Domain(domain) => f.write_str(domain),
        }
    }
}

/// Immutable description of a network endpoint a session is routed toward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub address: Address,
    pub network: Network,
    pub port: u16,
}

impl Destination {
    pub fn new(address: Address, network: Network, port: u16) -> Self {
        Self {
            address,
            network,
            port,
        }
    }

    pub fn tcp(address: impl Into<Address>, port: u16) -> Self {
        Self::new(address.into(), Network::Tcp, port)
    }

    pub fn udp(address: impl Into<Address>, port: u16) -> Self {
        Self::new(address.into(), Network::Udp, port)
    }

    pub fn family(&self) -> AddressFamily {
        self.address.family()
    }

    /// Returns a copy pointing at `address`; network and port are kept.
    pub fn with_address(&self, address: impl Into<Address>) -> Self {
        Self::new(address.into(), self.network, self.port)
    }

    /// Concrete socket address, available only when the address is an IP.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.address.ip().map(|ip| SocketAddr::new(ip, self.port))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.network, self.address, self.port)
    }
}

impl From<SocketAddr> for Destination {
    fn from(addr: SocketAddr) -> Self {
        Destination::tcp(addr.ip(), addr.port())
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[..=end];
        let port_str = s[end + 1..].strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

impl FromStr for Destination {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (network, rest) = if let Some(rest) = s.strip_prefix("tcp://") {
            (Network::Tcp, rest)
        } else if let Some(rest) = s.strip_prefix("udp://") {
            (Network::Udp, rest)
        } else {
            (Network::Tcp, s)
        };

        let (host, port) = parse_host_port(rest).ok_or_else(|| {
            DomainError::InvalidDestination(format!(
                "Invalid destination '{}'. Expected '[tcp|udp]://HOST:PORT'",
                s
            ))
        })?;

        Ok(Destination::new(Address::parse(host)?, network, port))
    }
}
