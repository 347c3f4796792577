use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_HOST;

/// Address the bridge listener binds to.
///
/// The host application only ever hands out loopback ports, so the host
/// component defaults to `127.0.0.1`; it stays configurable for tests that
/// need an explicit interface.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BridgeEndpoint {
    pub host: String,
    pub port: u16,
}

impl BridgeEndpoint {
    /// Builds an endpoint on an explicit host interface.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Builds a loopback endpoint on the given port.
    #[must_use]
    pub fn loopback(port: u16) -> Self {
        Self::new(DEFAULT_HOST, port)
    }
}

impl fmt::Display for BridgeEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_scheme() {
        let endpoint = BridgeEndpoint::loopback(9000);
        assert_eq!(endpoint.to_string(), "tcp://127.0.0.1:9000");
    }
}
