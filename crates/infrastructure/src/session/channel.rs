use async_trait::async_trait;
use bytes::Bytes;
use ferrous_outbound_application::ports::{InboundReader, OutboundWriter, StreamPair};
use ferrous_outbound_domain::DomainError;
use tokio::sync::mpsc;

/// The inbound handler's view of an in-process session.
///
/// Bytes sent on `uplink` reach the dispatcher; dropping it signals end of
/// data. `downlink` yields the response and returns `None` once the
/// dispatcher has closed the session.
pub struct InboundSide {
    pub uplink: mpsc::Sender<Bytes>,
    pub downlink: mpsc::Receiver<Bytes>,
}

pub struct ChannelInbound {
    rx: mpsc::Receiver<Bytes>,
}

#[async_trait]
impl InboundReader for ChannelInbound {
    async fn read(&mut self) -> Result<Option<Bytes>, DomainError> {
        Ok(self.rx.recv().await)
    }

    fn release(&mut self) {
        self.rx.close();
    }
}

pub struct ChannelOutbound {
    tx: Option<mpsc::Sender<Bytes>>,
}

#[async_trait]
impl OutboundWriter for ChannelOutbound {
    async fn write(&mut self, chunk: Bytes) -> Result<(), DomainError> {
        let tx = self.tx.as_ref().ok_or(DomainError::StreamClosed)?;
        tx.send(chunk).await.map_err(|_| DomainError::StreamClosed)
    }

    fn close(&mut self) {
        self.tx = None;
    }
}

/// Bounded channel pair connecting an inbound handler to a dispatcher.
pub fn channel_pair(capacity: usize) -> (InboundSide, StreamPair) {
    let (uplink_tx, uplink_rx) = mpsc::channel(capacity);
    let (downlink_tx, downlink_rx) = mpsc::channel(capacity);

    let side = InboundSide {
        uplink: uplink_tx,
        downlink: downlink_rx,
    };
    let streams = StreamPair::new(
        ChannelInbound { rx: uplink_rx },
        ChannelOutbound {
            tx: Some(downlink_tx),
        },
    );
    (side, streams)
}
