//! Loopback TCP bridge between the host application and the processor.
//!
//! ## Protocol
//!
//! The host connects, sends one request, and reads one response:
//!
//! - the bare text `health_check` is acknowledged with `OK`, bypassing the
//!   JSON layer entirely;
//! - anything else must be a single JSON object, which is processed and
//!   echoed back with an outcome marker;
//! - text that fails to decode is answered with
//!   `{"error":"Invalid JSON"}`.
//!
//! There is no framing: a request must arrive within one bounded read and
//! the response is written in one send. The accept loop services exactly
//! one connection at a time and survives every per-connection failure.

use std::sync::Arc;

use tracing::info;

use soother_config::{BridgeEndpoint, Config};

use crate::processor::PayloadProcessor;

mod errors;
mod handler;
mod listener;
#[cfg(test)]
mod listener_tests;
#[cfg(test)]
mod test_utils;

pub use errors::{ListenerError, ServeError};
pub use handler::{
    BridgeConnectionHandler, ConnectionHandler, HEALTH_CHECK_ACK, HEALTH_CHECK_TOKEN,
};
pub use listener::{BridgeHandle, BridgeListener};

const BRIDGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bridge");

/// Serves the bridge until the process receives a termination signal.
///
/// Binding happens before the signal handlers are installed so a bind
/// failure aborts startup immediately.
pub fn serve_until_shutdown(endpoint: &BridgeEndpoint, config: &Config) -> Result<(), ServeError> {
    let listener = BridgeListener::bind(endpoint, config.limits)?;
    let processor = PayloadProcessor::new(config.policy);
    let handler = Arc::new(BridgeConnectionHandler::new(processor, config.limits));
    let handle = listener.serve(handler)?;

    wait_for_termination()?;
    info!(target: BRIDGE_TARGET, "shutting down bridge listener");
    handle.shutdown();
    handle.join()?;
    Ok(())
}

fn wait_for_termination() -> Result<(), ServeError> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGTERM, SIGINT]).map_err(|source| ServeError::Signals { source })?;
    if let Some(signal) = signals.forever().next() {
        info!(target: BRIDGE_TARGET, signal, "termination signal received");
    }
    Ok(())
}
