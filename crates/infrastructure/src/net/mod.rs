pub mod dialer;
pub mod tcp_connection;
pub mod udp_connection;

pub use dialer::SystemDialer;
pub use tcp_connection::TcpConnection;
pub use udp_connection::UdpConnection;
