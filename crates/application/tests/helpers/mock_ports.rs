#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_outbound_application::ports::{
    BoxedConnection, Connection, Dialer, DispatchLog, InboundReader, NameLookup, OutboundWriter,
    StreamPair,
};
use ferrous_outbound_domain::{DialOptions, Destination, DomainError, Network};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};
use tokio::sync::mpsc;

// ── logging ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl DispatchLog for RecordingLog {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
}

// ── name lookup ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNameLookup {
    answers: Mutex<HashMap<String, Vec<IpAddr>>>,
    failing: Mutex<bool>,
    calls: AtomicUsize,
}

impl MockNameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(domain: &str, ips: &[&str]) -> Self {
        let lookup = Self::new();
        lookup.set_answer(domain, ips);
        lookup
    }

    pub fn set_answer(&self, domain: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), ips);
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameLookup for MockNameLookup {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(DomainError::LookupFailed {
                domain: domain.to_string(),
                reason: "mock lookup failed".to_string(),
            });
        }
        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default())
    }
}

// ── connection ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ConnectionProbe {
    closed: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ConnectionProbe {
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }
}

/// Connection backed by one end of an in-memory duplex pipe; the test
/// drives the other end as the remote server.
pub struct MockConnection {
    inner: DuplexStream,
    network: Network,
    probe: ConnectionProbe,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockConnection {
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

pub fn connection_pair(network: Network) -> (MockConnection, DuplexStream, ConnectionProbe) {
    let (local, remote) = tokio::io::duplex(64 * 1024);
    let probe = ConnectionProbe::default();
    let connection = MockConnection {
        inner: local,
        network,
        probe: probe.clone(),
        fail_reads: false,
        fail_writes: false,
    };
    (connection, remote, probe)
}

impl AsyncRead for MockConnection {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.fail_reads {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "mock read failure",
            )));
        }
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for MockConnection {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_writes {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock write failure",
            )));
        }
        let poll = Pin::new(&mut self.inner).poll_write(cx, data);
        if let Poll::Ready(Ok(n)) = &poll {
            self.probe.writes.lock().unwrap().push(data[..*n].to_vec());
        }
        poll
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let poll = Pin::new(&mut self.inner).poll_shutdown(cx);
        if let Poll::Ready(Ok(())) = &poll {
            self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
        poll
    }
}

impl Connection for MockConnection {
    fn network(&self) -> Network {
        self.network
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.probe.closed.fetch_add(1, Ordering::SeqCst);
    }
}

// ── dialer ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDialer {
    script: Mutex<VecDeque<Result<BoxedConnection, DomainError>>>,
    calls: AtomicUsize,
    dialed: Mutex<Vec<(Option<IpAddr>, Destination)>>,
}

impl MockDialer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_then(failures: usize, connection: MockConnection) -> Self {
        let dialer = Self::new();
        for n in 0..failures {
            dialer.push_failure(&format!("mock failure {}", n + 1));
        }
        dialer.push_connection(connection);
        dialer
    }

    pub fn push_failure(&self, reason: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(DomainError::DialFailed {
                destination: "mock".to_string(),
                reason: reason.to_string(),
            }));
    }

    pub fn push_connection(&self, connection: MockConnection) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(Box::new(connection)));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dialed(&self) -> Vec<Destination> {
        self.dialed
            .lock()
            .unwrap()
            .iter()
            .map(|(_, dest)| dest.clone())
            .collect()
    }

    pub fn sources(&self) -> Vec<Option<IpAddr>> {
        self.dialed
            .lock()
            .unwrap()
            .iter()
            .map(|(source, _)| *source)
            .collect()
    }
}

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(
        &self,
        source: Option<IpAddr>,
        destination: &Destination,
        _options: &DialOptions,
    ) -> Result<BoxedConnection, DomainError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.dialed
            .lock()
            .unwrap()
            .push((source, destination.clone()));
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(DomainError::DialFailed {
                destination: destination.to_string(),
                reason: format!("unscripted attempt {}", attempt),
            })
        })
    }
}

// ── session streams ────────────────────────────────────────────────────────

pub type InboundSender = mpsc::UnboundedSender<Result<Bytes, DomainError>>;

#[derive(Clone, Default)]
pub struct StreamProbe {
    released: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<u8>>>,
}

impl StreamProbe {
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<u8> {
        self.received.lock().unwrap().clone()
    }
}

pub struct ScriptedInbound {
    rx: mpsc::UnboundedReceiver<Result<Bytes, DomainError>>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl InboundReader for ScriptedInbound {
    async fn read(&mut self) -> Result<Option<Bytes>, DomainError> {
        match self.rx.recv().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct RecordingOutbound {
    received: Arc<Mutex<Vec<u8>>>,
    closed: Arc<AtomicUsize>,
    fail_writes: bool,
}

#[async_trait]
impl OutboundWriter for RecordingOutbound {
    async fn write(&mut self, chunk: Bytes) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::StreamClosed);
        }
        self.received.lock().unwrap().extend_from_slice(&chunk);
        Ok(())
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn stream_pair() -> (InboundSender, StreamPair, StreamProbe) {
    build_stream_pair(false)
}

pub fn stream_pair_with_failing_output() -> (InboundSender, StreamPair, StreamProbe) {
    build_stream_pair(true)
}

fn build_stream_pair(fail_writes: bool) -> (InboundSender, StreamPair, StreamProbe) {
    let (tx, rx) = mpsc::unbounded_channel();
    let probe = StreamProbe::default();
    let input = ScriptedInbound {
        rx,
        released: Arc::clone(&probe.released),
    };
    let output = RecordingOutbound {
        received: Arc::clone(&probe.received),
        closed: Arc::clone(&probe.closed),
        fail_writes,
    };
    (tx, StreamPair::new(input, output), probe)
}
