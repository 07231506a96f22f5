use bytes::{Bytes, BytesMut};
use ferrous_outbound_domain::{Destination, Network, DEFAULT_UDP_TIMEOUT_SECS};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio_util::sync::CancellationToken;

use crate::ports::{BoxedConnection, DispatchLog, InboundHandle, OutboundHandle, StreamPair};

const RELAY_BUFFER_SIZE: usize = 16 * 1024;
/// Largest UDP payload; a datagram never spans two reads.
const DATAGRAM_BUFFER_SIZE: usize = 65_535;

fn read_buffer_size(network: Network) -> usize {
    match network {
        Network::Tcp => RELAY_BUFFER_SIZE,
        Network::Udp => DATAGRAM_BUFFER_SIZE,
    }
}

/// Per-read idle timeout for the downlink.
///
/// UDP always uses [`DEFAULT_UDP_TIMEOUT_SECS`]. TCP uses the configured value,
/// where 0 means reads may block indefinitely.
pub fn effective_timeout(network: Network, configured_secs: u32) -> Option<Duration> {
    match network {
        Network::Udp => Some(Duration::from_secs(u64::from(DEFAULT_UDP_TIMEOUT_SECS))),
        Network::Tcp if configured_secs > 0 => Some(Duration::from_secs(u64::from(configured_secs))),
        Network::Tcp => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UplinkEnd {
    Eof,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownlinkEnd {
    Eof,
    IdleTimeout,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayReport {
    /// `None` when the uplink never started or its task did not finish normally.
    pub uplink: Option<UplinkEnd>,
    pub downlink: DownlinkEnd,
    pub bytes_up: u64,
    pub bytes_down: u64,
}

enum ReadOutcome {
    Data,
    /// Zero-length datagram; UDP has no end-of-data marker.
    Empty,
    Eof,
    TimedOut,
    Failed(io::Error),
}

/// Full-duplex copy between one outbound connection and a session's streams.
pub struct DuplexRelay {
    destination: Destination,
    idle_timeout: Option<Duration>,
    log: Arc<dyn DispatchLog>,
    cancel: CancellationToken,
}

impl DuplexRelay {
    pub fn new(
        destination: Destination,
        idle_timeout: Option<Duration>,
        log: Arc<dyn DispatchLog>,
    ) -> Self {
        Self {
            destination,
            idle_timeout,
            log,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Writes `initial_payload`, then relays until the downlink finishes.
    ///
    /// The uplink runs on its own task and is cancelled and joined once the
    /// downlink is done. The outbound stream is closed when the downlink ends;
    /// the inbound stream and the connection are released before returning.
    pub async fn run(
        self,
        connection: BoxedConnection,
        streams: StreamPair,
        initial_payload: Bytes,
    ) -> RelayReport {
        let (input, mut output) = streams.into_parts();
        let network = connection.network();
        let (mut conn_reader, mut conn_writer) = tokio::io::split(connection);

        if !initial_payload.is_empty() {
            let written = async {
                conn_writer.write_all(&initial_payload).await?;
                conn_writer.flush().await
            }
            .await;
            drop(initial_payload);

            if let Err(e) = written {
                self.log.info(&format!(
                    "Failed to write initial payload to {}: {}",
                    self.destination, e
                ));
                return RelayReport {
                    uplink: None,
                    downlink: DownlinkEnd::Failed,
                    bytes_up: 0,
                    bytes_down: 0,
                };
            }
        }

        let session = self.cancel.child_token();
        let uplink = tokio::spawn(pump_uplink(
            input,
            conn_writer,
            network,
            session.clone(),
            Arc::clone(&self.log),
            self.destination.clone(),
        ));

        let (downlink, bytes_down) = self
            .pump_downlink(&mut conn_reader, &mut output, network, &session)
            .await;
        drop(output);

        session.cancel();
        let (uplink, bytes_up) = match uplink.await {
            Ok((end, transferred)) => (Some(end), transferred),
            Err(e) => {
                self.log.warn(&format!(
                    "Uplink task to {} ended abnormally: {}",
                    self.destination, e
                ));
                (None, 0)
            }
        };
        drop(conn_reader);

        RelayReport {
            uplink,
            downlink,
            bytes_up,
            bytes_down,
        }
    }

    async fn pump_downlink(
        &self,
        reader: &mut ReadHalf<BoxedConnection>,
        output: &mut OutboundHandle,
        network: Network,
        cancel: &CancellationToken,
    ) -> (DownlinkEnd, u64) {
        let buffer_size = read_buffer_size(network);
        let mut buf = BytesMut::with_capacity(buffer_size);
        let mut transferred = 0u64;

        let end = loop {
            buf.reserve(buffer_size);
            let outcome = tokio::select! {
                _ = cancel.cancelled() => break DownlinkEnd::Cancelled,
                outcome = read_chunk(reader, &mut buf, network, self.idle_timeout) => outcome,
            };

            match outcome {
                ReadOutcome::Data => {
                    let chunk = buf.split().freeze();
                    let len = chunk.len() as u64;
                    let written = tokio::select! {
                        _ = cancel.cancelled() => break DownlinkEnd::Cancelled,
                        written = output.write(chunk) => written,
                    };
                    if let Err(e) = written {
                        self.log.info(&format!(
                            "Failed to transport all response from {}: {}",
                            self.destination, e
                        ));
                        break DownlinkEnd::Failed;
                    }
                    transferred += len;
                }
                ReadOutcome::Empty => continue,
                ReadOutcome::Eof => break DownlinkEnd::Eof,
                ReadOutcome::TimedOut => {
                    self.log.debug(&format!(
                        "Downlink from {} idle for {:?}, finishing",
                        self.destination, self.idle_timeout
                    ));
                    break DownlinkEnd::IdleTimeout;
                }
                ReadOutcome::Failed(e) => {
                    self.log.info(&format!(
                        "Failed to transport all response from {}: {}",
                        self.destination, e
                    ));
                    break DownlinkEnd::Failed;
                }
            }
        };

        (end, transferred)
    }
}

async fn read_chunk<R>(
    reader: &mut R,
    buf: &mut BytesMut,
    network: Network,
    timeout: Option<Duration>,
) -> ReadOutcome
where
    R: AsyncRead + Unpin,
{
    let read = reader.read_buf(buf);
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, read).await {
            Ok(result) => result,
            Err(_) => return ReadOutcome::TimedOut,
        },
        None => read.await,
    };

    match result {
        Ok(0) if network == Network::Udp => ReadOutcome::Empty,
        Ok(0) => ReadOutcome::Eof,
        Ok(_) => ReadOutcome::Data,
        Err(e) => ReadOutcome::Failed(e),
    }
}

async fn pump_uplink(
    mut input: InboundHandle,
    mut writer: WriteHalf<BoxedConnection>,
    network: Network,
    cancel: CancellationToken,
    log: Arc<dyn DispatchLog>,
    destination: Destination,
) -> (UplinkEnd, u64) {
    let mut transferred = 0u64;

    let end = loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => break UplinkEnd::Cancelled,
            chunk = input.read() => chunk,
        };

        match chunk {
            Ok(Some(bytes)) => {
                let written = tokio::select! {
                    _ = cancel.cancelled() => break UplinkEnd::Cancelled,
                    written = writer.write_all(&bytes) => written,
                };
                if let Err(e) = written {
                    log.info(&format!(
                        "Failed to transport all request to {}: {}",
                        destination, e
                    ));
                    break UplinkEnd::Failed;
                }
                transferred += bytes.len() as u64;
            }
            Ok(None) => {
                if network.supports_half_close() {
                    if let Err(e) = writer.shutdown().await {
                        log.debug(&format!(
                            "Failed to half-close connection to {}: {}",
                            destination, e
                        ));
                    }
                }
                break UplinkEnd::Eof;
            }
            Err(e) => {
                log.info(&format!(
                    "Failed to transport all request to {}: {}",
                    destination, e
                ));
                break UplinkEnd::Failed;
            }
        }
    };

    drop(input);
    (end, transferred)
}
