//! Tests for the bridge listener and its accept loop.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};
use serde_json::json;

use soother_config::{BridgeEndpoint, BridgeLimits, ValidationPolicy};

use super::listener::{BridgeHandle, BridgeListener};
use super::test_utils::CountingHandler;
use super::{BridgeConnectionHandler, ConnectionHandler, ListenerError};
use crate::processor::PayloadProcessor;

#[fixture]
fn loopback_endpoint() -> BridgeEndpoint {
    BridgeEndpoint::loopback(0)
}

fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

/// Binds a bridge with the real protocol handler and returns its address.
fn start_bridge(policy: ValidationPolicy, limits: BridgeLimits) -> (SocketAddr, BridgeHandle) {
    let listener =
        BridgeListener::bind(&BridgeEndpoint::loopback(0), limits).expect("bind bridge listener");
    let addr = listener
        .local_addr()
        .expect("listener should report local address");
    let handler: Arc<dyn ConnectionHandler> = Arc::new(BridgeConnectionHandler::new(
        PayloadProcessor::new(policy),
        limits,
    ));
    let handle = listener.serve(handler).expect("start bridge listener");
    (addr, handle)
}

fn round_trip(addr: SocketAddr, request: &[u8]) -> String {
    let mut client = TcpStream::connect(addr).expect("connect client");
    client.write_all(request).expect("write request");
    client.flush().expect("flush request");
    let mut response = String::new();
    client
        .read_to_string(&mut response)
        .expect("read response");
    response
}

#[rstest]
fn listener_accepts_successive_connections(loopback_endpoint: BridgeEndpoint) {
    let listener = BridgeListener::bind(&loopback_endpoint, BridgeLimits::default())
        .expect("bind bridge listener");
    let addr = listener
        .local_addr()
        .expect("listener should report local address");
    let (count, handler) = CountingHandler::new();
    let handle = listener.serve(handler).expect("start bridge listener");

    TcpStream::connect(addr).expect("connect first client");
    TcpStream::connect(addr).expect("connect second client");

    assert!(wait_for_count(&count, 2), "expected two connections");
    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn malformed_request_does_not_poison_the_loop() {
    let (addr, handle) = start_bridge(ValidationPolicy::Strict, BridgeLimits::default());

    let error_response = round_trip(addr, b"{not json");
    let wire: serde_json::Value =
        serde_json::from_str(&error_response).expect("error response json");
    assert_eq!(wire, json!({"error": "Invalid JSON"}));

    let ok_response = round_trip(addr, br#"{"CampaignName":"Acme"}"#);
    let wire: serde_json::Value = serde_json::from_str(&ok_response).expect("ok response json");
    assert_eq!(wire, json!({"CampaignName": "Acme", "processed": true}));

    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn health_check_and_data_requests_interleave() {
    let (addr, handle) = start_bridge(ValidationPolicy::Strict, BridgeLimits::default());

    assert_eq!(round_trip(addr, b"health_check"), "OK");
    let response = round_trip(addr, br#"{"PacifierId":"P1"}"#);
    assert!(response.contains(r#""processed":true"#));
    assert_eq!(round_trip(addr, b"health_check"), "OK");

    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn silent_peer_trips_the_read_timeout() {
    let limits = BridgeLimits {
        read_timeout_ms: 100,
        ..BridgeLimits::default()
    };
    let (addr, handle) = start_bridge(ValidationPolicy::Strict, limits);

    // Connect but never send; the server must give up and close.
    let mut silent = TcpStream::connect(addr).expect("connect silent client");
    let mut nothing = String::new();
    silent
        .read_to_string(&mut nothing)
        .expect("server should close the silent connection");
    assert!(nothing.is_empty());

    // The loop is still alive for the next client.
    assert_eq!(round_trip(addr, b"health_check"), "OK");

    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn shutdown_stops_the_accept_loop() {
    let (addr, handle) = start_bridge(ValidationPolicy::Strict, BridgeLimits::default());
    assert_eq!(round_trip(addr, b"health_check"), "OK");

    handle.shutdown();
    handle.join().expect("join listener");

    // The socket is gone once the loop exits.
    assert!(TcpStream::connect(addr).is_err());
}

#[test]
fn binding_an_occupied_port_fails() {
    let first = BridgeListener::bind(&BridgeEndpoint::loopback(0), BridgeLimits::default())
        .expect("bind first listener");
    let addr = first.local_addr().expect("first listener address");

    let occupied = BridgeEndpoint::loopback(addr.port());
    let error = BridgeListener::bind(&occupied, BridgeLimits::default())
        .expect_err("second bind should fail");
    assert!(matches!(error, ListenerError::Bind { .. }));
}
