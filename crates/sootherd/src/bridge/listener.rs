//! Accept loop and lifecycle handle for the bridge listener.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use soother_config::{BridgeEndpoint, BridgeLimits};

use super::{BRIDGE_TARGET, ConnectionHandler, ListenerError};

/// Poll interval between non-blocking accept attempts. This bounds how
/// long the loop can ignore the shutdown flag.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listener bound to a bridge endpoint.
#[derive(Debug)]
pub struct BridgeListener {
    endpoint: BridgeEndpoint,
    listener: TcpListener,
    limits: BridgeLimits,
}

impl BridgeListener {
    /// Binds the endpoint; any failure here must abort startup.
    pub fn bind(endpoint: &BridgeEndpoint, limits: BridgeLimits) -> Result<Self, ListenerError> {
        let addr = resolve(endpoint)?;
        let listener = TcpListener::bind(addr).map_err(|source| ListenerError::Bind {
            addr,
            source,
        })?;
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
            limits,
        })
    }

    /// Actual bound address; useful when the endpoint asked for port 0.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Starts the accept loop on a background thread.
    ///
    /// Connections are handled inline, one at a time; the loop never
    /// spawns per-connection work and shares nothing with the caller
    /// beyond the shutdown flag in the returned handle.
    pub fn serve(self, handler: Arc<dyn ConnectionHandler>) -> Result<BridgeHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || run_accept_loop(&self, &shutdown_flag, handler));
        Ok(BridgeHandle {
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept loop.
///
/// Dropping the handle requests shutdown; `join` waits for the loop to
/// observe it and exit.
pub struct BridgeHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BridgeHandle {
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &BridgeListener,
    shutdown: &AtomicBool,
    handler: Arc<dyn ConnectionHandler>,
) {
    info!(
        target: BRIDGE_TARGET,
        endpoint = %listener.endpoint,
        "bridge listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(listener) {
            Ok(Some(stream)) => {
                last_error = None;
                // One connection at a time: the next accept waits until
                // this request is fully answered.
                handler.handle(stream);
            }
            Ok(None) => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: BRIDGE_TARGET,
                        error = %error,
                        "bridge accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

fn accept_connection(listener: &BridgeListener) -> io::Result<Option<TcpStream>> {
    match listener.listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            apply_timeouts(&stream, &listener.limits)?;
            Ok(Some(stream))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

/// Guards the single read/write cycle against silent or half-open peers.
fn apply_timeouts(stream: &TcpStream, limits: &BridgeLimits) -> io::Result<()> {
    let timeout = limits.read_timeout();
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)
}

fn resolve(endpoint: &BridgeEndpoint) -> Result<SocketAddr, ListenerError> {
    let mut addrs = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;
    addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        endpoint: endpoint.to_string(),
    })
}
