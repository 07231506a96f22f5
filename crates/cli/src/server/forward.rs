use bytes::Bytes;
use ferrous_outbound_application::ports::StreamPair;
use ferrous_outbound_application::use_cases::OutboundDispatcher;
use ferrous_outbound_domain::Destination;
use ferrous_outbound_infrastructure::session::{IoInboundReader, IoOutboundWriter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Accepts TCP clients and dispatches each one to `destination` until
/// `shutdown` fires, then waits for in-flight sessions to wind down.
pub async fn run_forwarder(
    listen_address: &str,
    destination: Destination,
    dispatcher: Arc<OutboundDispatcher>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_address).await?;
    info!(
        listen_address = %listener.local_addr()?,
        destination = %destination,
        "Forwarder listening"
    );

    let mut sessions = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!(peer = %peer, error = %e, "Failed to set TCP_NODELAY on client");
                    }
                    let (reader, writer) = stream.into_split();
                    let streams = StreamPair::new(
                        IoInboundReader::new(reader),
                        IoOutboundWriter::new(writer),
                    );
                    let dispatcher = Arc::clone(&dispatcher);
                    let destination = destination.clone();

                    debug!(peer = %peer, "Client accepted");
                    sessions.spawn(async move {
                        dispatcher.dispatch(destination, Bytes::new(), streams).await;
                    });
                }
                Err(e) => warn!(error = %e, "Failed to accept client"),
            },
            Some(_) = sessions.join_next(), if !sessions.is_empty() => {}
        }
    }

    info!(active = sessions.len(), "Waiting for active sessions to finish");
    while sessions.join_next().await.is_some() {}
    Ok(())
}
