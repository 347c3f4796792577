use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_MAX_REQUEST_BYTES, DEFAULT_READ_TIMEOUT_MS};

/// Transport limits applied to every bridge connection.
///
/// The protocol has no framing: a request must arrive within one bounded
/// read and a response is written in one send, so the read limit doubles as
/// the maximum payload size.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct BridgeLimits {
    /// Maximum bytes accepted in the single request read.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
    /// Per-connection read/write timeout in milliseconds; `0` disables it.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl BridgeLimits {
    /// Timeout applied to reads and writes on accepted streams, if any.
    #[must_use]
    pub fn read_timeout(&self) -> Option<Duration> {
        if self.read_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.read_timeout_ms))
        }
    }
}

impl Default for BridgeLimits {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}
