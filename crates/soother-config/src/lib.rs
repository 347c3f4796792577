//! Shared configuration types for the soother workspace.
//!
//! The worker binary assembles a [`Config`] from its command-line surface;
//! the bridge and processor layers consume the typed pieces. Defaults live
//! in [`defaults`] so the CLI help text and the serde fallbacks agree.

pub mod defaults;
mod endpoint;
mod limits;
mod logging;
mod policy;

pub use endpoint::BridgeEndpoint;
pub use limits::BridgeLimits;
pub use logging::LogFormat;
pub use policy::ValidationPolicy;

use serde::{Deserialize, Serialize};

/// Resolved worker configuration.
///
/// `endpoint` selects the operating mode: `Some` runs the TCP bridge on that
/// endpoint, `None` processes a single request over stdio.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<BridgeEndpoint>,
    #[serde(default)]
    pub limits: BridgeLimits,
    #[serde(default)]
    pub policy: ValidationPolicy,
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            limits: BridgeLimits::default(),
            policy: ValidationPolicy::default(),
            log_filter: defaults::default_log_filter_string(),
            log_format: LogFormat::default(),
        }
    }
}
