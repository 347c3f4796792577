//! Error types for the bridge transport.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the bridge listener.
///
/// All of these are fatal at startup; nothing in this enum is produced by
/// an individual connection.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to resolve bridge address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("no addresses resolved for {endpoint}")]
    ResolveEmpty { endpoint: String },
    #[error("failed to bind bridge listener at {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to enable non-blocking accept: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    #[error("bridge listener thread panicked")]
    ThreadPanic,
}

/// Errors surfaced by the top-level serve loop.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("failed to install shutdown signal handlers: {source}")]
    Signals {
        #[source]
        source: io::Error,
    },
}
