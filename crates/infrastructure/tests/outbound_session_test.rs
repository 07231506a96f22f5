use bytes::Bytes;
use ferrous_outbound_application::use_cases::{DispatchDeps, OutboundDispatcher};
use ferrous_outbound_domain::{
    Address, Destination, DomainStrategy, OutboundConfig, OutboundMeta,
};
use ferrous_outbound_infrastructure::logging::TracingDispatchLog;
use ferrous_outbound_infrastructure::lookup::StaticHostsLookup;
use ferrous_outbound_infrastructure::net::SystemDialer;
use ferrous_outbound_infrastructure::session::{channel_pair, InboundSide};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

mod helpers;
use helpers::MockTcpEchoServer;

#[tokio::test]
async fn test_channel_session_through_system_dialer() {
    let server = MockTcpEchoServer::start().await.unwrap();
    let dispatcher = OutboundDispatcher::new(
        &OutboundConfig::default(),
        OutboundMeta::default(),
        DispatchDeps {
            dialer: Arc::new(SystemDialer::new()),
            name_lookup: None,
            log: Arc::new(TracingDispatchLog::new("direct")),
        },
    )
    .unwrap();

    let (side, streams) = channel_pair(64);
    let InboundSide {
        uplink,
        mut downlink,
    } = side;
    uplink.send(Bytes::from_static(b" world")).await.unwrap();
    drop(uplink);

    let session = tokio::spawn(async move {
        dispatcher
            .dispatch(
                Destination::from(server.addr()),
                Bytes::from_static(b"hello"),
                streams,
            )
            .await;
        server
    });

    let mut received = Vec::new();
    while let Some(chunk) = downlink.recv().await {
        received.extend_from_slice(&chunk);
    }
    assert_eq!(received, b"hello world");
    session.await.unwrap();
}

#[tokio::test]
async fn test_use_ip_resolves_through_static_hosts() {
    let server = MockTcpEchoServer::start().await.unwrap();
    let mut table: HashMap<String, Vec<IpAddr>> = HashMap::new();
    table.insert("echo.test".to_string(), vec![server.addr().ip()]);

    let config = OutboundConfig {
        domain_strategy: DomainStrategy::UseIp,
        ..OutboundConfig::default()
    };
    let dispatcher = OutboundDispatcher::new(
        &config,
        config.meta(),
        DispatchDeps {
            dialer: Arc::new(SystemDialer::new()),
            name_lookup: Some(Arc::new(StaticHostsLookup::new(&table))),
            log: Arc::new(TracingDispatchLog::new("direct")),
        },
    )
    .unwrap();

    let (side, streams) = channel_pair(64);
    let InboundSide {
        uplink,
        mut downlink,
    } = side;
    drop(uplink);

    let dest = Destination::tcp(Address::Domain("echo.test".into()), server.addr().port());
    let session = tokio::spawn(async move {
        dispatcher
            .dispatch(dest, Bytes::from_static(b"ping"), streams)
            .await;
    });

    let mut received = Vec::new();
    while let Some(chunk) = downlink.recv().await {
        received.extend_from_slice(&chunk);
    }
    assert_eq!(received, b"ping");
    session.await.unwrap();
    assert_eq!(server.peers().len(), 1);
}
