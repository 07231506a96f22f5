use ferrous_outbound_application::ports::Connection;
use ferrous_outbound_domain::Network;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::UdpSocket;

/// A connected UDP socket viewed as a byte stream.
///
/// Each write is sent as one datagram and each read yields at most one
/// datagram. A zero-length datagram reads as 0 bytes, so callers cannot tell
/// it from end of stream without checking [`Connection::network`]. Shutdown
/// is a no-op since UDP has no half-close.
pub struct UdpConnection {
    socket: UdpSocket,
}

impl UdpConnection {
    /// `socket` must already be connected to its peer.
    pub fn new(socket: UdpSocket) -> Self {
        Self { socket }
    }
}

impl AsyncRead for UdpConnection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.socket.poll_recv(cx, buf)
    }
}

impl AsyncWrite for UdpConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.socket.poll_send(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl Connection for UdpConnection {
    fn network(&self) -> Network {
        Network::Udp
    }
}
