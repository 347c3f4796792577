//! Default values shared by the CLI surface and serde fallbacks.

/// Host interface the bridge binds to when none is supplied.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Maximum request size accepted in the single bounded read.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Read/write timeout applied to accepted connections.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
