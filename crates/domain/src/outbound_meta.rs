use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Socket-level knobs handed to the dialer on every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialOptions {
    pub connect_timeout: Option<Duration>,
    pub tcp_nodelay: bool,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            tcp_nodelay: true,
            tcp_keepalive: None,
        }
    }
}

/// Identity and dialing context of one outbound handler instance.
#[derive(Debug, Clone)]
pub struct OutboundMeta {
    pub tag: Arc<str>,
    /// Local address outbound sockets bind to before connecting.
    pub send_through: Option<IpAddr>,
    pub dial_options: DialOptions,
}

impl OutboundMeta {
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self {
            tag: tag.into(),
            send_through: None,
            dial_options: DialOptions::default(),
        }
    }

    pub fn with_send_through(mut self, addr: IpAddr) -> Self {
        self.send_through = Some(addr);
        self
    }

    pub fn with_dial_options(mut self, options: DialOptions) -> Self {
        self.dial_options = options;
        self
    }
}

impl Default for OutboundMeta {
    fn default() -> Self {
        Self::new("direct")
    }
}
