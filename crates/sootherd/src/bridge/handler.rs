//! Per-connection protocol handling.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use tracing::{debug, warn};

use soother_config::BridgeLimits;

use super::BRIDGE_TARGET;
use crate::payload::RequestPayload;
use crate::processor::PayloadProcessor;

/// Liveness probe token sent by the host outside the JSON protocol.
pub const HEALTH_CHECK_TOKEN: &str = "health_check";
/// Acknowledgement returned for the liveness probe.
pub const HEALTH_CHECK_ACK: &str = "OK";

/// Answer for requests that fail to decode as a JSON object.
const INVALID_JSON_RESPONSE: &[u8] = br#"{"error":"Invalid JSON"}"#;

/// Handles accepted connections.
///
/// Implementations must contain their own failures: a panic or propagated
/// error here would take down the accept loop.
pub trait ConnectionHandler: Send + Sync + 'static {
    fn handle(&self, stream: TcpStream);
}

/// Protocol handler: one bounded read, one response, close.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConnectionHandler {
    processor: PayloadProcessor,
    limits: BridgeLimits,
}

impl BridgeConnectionHandler {
    #[must_use]
    pub fn new(processor: PayloadProcessor, limits: BridgeLimits) -> Self {
        Self { processor, limits }
    }

    fn respond(&self, stream: &mut TcpStream) {
        let request = match read_bounded(stream, self.limits.max_request_bytes) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(target: BRIDGE_TARGET, "client disconnected without sending data");
                return;
            }
            Err(error) => {
                warn!(target: BRIDGE_TARGET, error = %error, "failed to read request");
                return;
            }
        };

        if request == HEALTH_CHECK_TOKEN.as_bytes() {
            debug!(target: BRIDGE_TARGET, "answering health check");
            write_reply(stream, HEALTH_CHECK_ACK.as_bytes());
            return;
        }

        match RequestPayload::from_slice(&request) {
            Ok(payload) => {
                let response = self.processor.process(payload);
                match response.to_vec() {
                    Ok(wire) => write_reply(stream, &wire),
                    Err(error) => {
                        warn!(target: BRIDGE_TARGET, error = %error, "failed to serialise response");
                    }
                }
            }
            Err(error) => {
                debug!(target: BRIDGE_TARGET, error = %error, "request failed to decode");
                write_reply(stream, INVALID_JSON_RESPONSE);
            }
        }
    }
}

impl ConnectionHandler for BridgeConnectionHandler {
    fn handle(&self, mut stream: TcpStream) {
        self.respond(&mut stream);
    }
}

/// Performs the single bounded read the protocol allows.
///
/// Returns `Ok(None)` when the peer closes without sending anything. The
/// buffer caps the payload size; whatever the first successful read
/// returns is the whole request.
fn read_bounded(stream: &mut TcpStream, max_bytes: usize) -> io::Result<Option<Vec<u8>>> {
    let mut buffer = vec![0_u8; max_bytes];
    loop {
        match stream.read(&mut buffer) {
            Ok(0) => return Ok(None),
            Ok(read) => {
                buffer.truncate(read);
                return Ok(Some(buffer));
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

/// Writes the whole response in one send; failures are logged, not raised.
fn write_reply(stream: &mut TcpStream, reply: &[u8]) {
    if let Err(error) = stream.write_all(reply).and_then(|()| stream.flush()) {
        warn!(target: BRIDGE_TARGET, error = %error, "failed to write response");
    }
}
