//! Command-line surface and mode dispatch for the worker.

use clap::Parser;

use soother_config::{BridgeEndpoint, BridgeLimits, Config, LogFormat, ValidationPolicy, defaults};

/// Telemetry worker bridging the host application to campaign processing.
///
/// With a port the worker serves the loopback TCP bridge until terminated;
/// without one it processes a single request from stdin and exits.
#[derive(Debug, Parser)]
#[command(name = "sootherd", version, about)]
pub struct Cli {
    /// TCP port to serve the bridge on; omit to process one request over
    /// stdio.
    pub port: Option<u16>,

    /// Host interface to bind in bridge mode.
    #[arg(long, default_value = defaults::DEFAULT_HOST)]
    pub host: String,

    /// Maximum bytes accepted in a single request read.
    #[arg(long, default_value_t = defaults::DEFAULT_MAX_REQUEST_BYTES)]
    pub max_request_bytes: usize,

    /// Per-connection read timeout in milliseconds; 0 disables the timeout.
    #[arg(long, default_value_t = defaults::DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,

    /// Policy for payloads without a campaign name or pacifier id.
    #[arg(long, default_value_t = ValidationPolicy::default())]
    pub validation_policy: ValidationPolicy,

    /// Log filter expression (tracing EnvFilter syntax).
    #[arg(long, default_value = defaults::DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format.
    #[arg(long, default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolves the command line into the worker configuration.
    #[must_use]
    pub fn into_config(self) -> Config {
        let Self {
            port,
            host,
            max_request_bytes,
            read_timeout_ms,
            validation_policy,
            log_filter,
            log_format,
        } = self;
        Config {
            endpoint: port.map(|port| BridgeEndpoint::new(host, port)),
            limits: BridgeLimits {
                max_request_bytes,
                read_timeout_ms,
            },
            policy: validation_policy,
            log_filter,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[test]
    fn cli_declaration_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_selects_stdio_mode() {
        let cli = Cli::try_parse_from(["sootherd"]).expect("bare invocation should parse");
        let config = cli.into_config();
        assert!(config.endpoint.is_none());
        assert_eq!(config.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn port_argument_selects_bridge_mode() {
        let cli = Cli::try_parse_from(["sootherd", "8084"]).expect("port should parse");
        let config = cli.into_config();
        assert_eq!(config.endpoint, Some(BridgeEndpoint::loopback(8084)));
    }

    #[rstest]
    #[case("strict", ValidationPolicy::Strict)]
    #[case("permissive", ValidationPolicy::Permissive)]
    fn validation_policy_is_selectable(#[case] flag: &str, #[case] expected: ValidationPolicy) {
        let cli = Cli::try_parse_from(["sootherd", "--validation-policy", flag])
            .expect("policy flag should parse");
        assert_eq!(cli.into_config().policy, expected);
    }

    #[test]
    fn limits_flow_into_the_config() {
        let cli = Cli::try_parse_from([
            "sootherd",
            "8084",
            "--max-request-bytes",
            "4096",
            "--read-timeout-ms",
            "0",
        ])
        .expect("limit flags should parse");
        let config = cli.into_config();
        assert_eq!(config.limits.max_request_bytes, 4096);
        assert_eq!(config.limits.read_timeout(), None);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["sootherd", "not-a-port"]).is_err());
    }
}
