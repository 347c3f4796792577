//! Worker-side bridge between the host application and campaign processing.
//!
//! The host spawns this worker in one of two modes, decided once at
//! startup from the command line:
//!
//! - **Bridge mode** (a port is supplied): a loopback TCP listener accepts
//!   one connection at a time, reads a single JSON request, answers with
//!   the processed payload, and keeps accepting until the process is told
//!   to stop. A bare `health_check` probe is acknowledged with `OK`
//!   without touching the JSON layer.
//! - **Stdio mode** (no port): exactly one request is read from stdin to
//!   end-of-stream, processed, and echoed to stdout.
//!
//! Per-request failures are answered on the connection that caused them
//! and never stop the accept loop; only bind/startup failures are fatal.

use std::io;
use std::process::ExitCode;

use tracing::error;

pub mod bridge;
mod cli;
mod payload;
mod processor;
mod stdio;
mod telemetry;

pub use cli::Cli;
pub use payload::{DecodeError, PayloadSource, RequestPayload, ResponsePayload};
pub use processor::{MISSING_IDENTIFIER_ERROR, PayloadProcessor};
pub use stdio::{StdioError, run_once};
pub use telemetry::{TelemetryError, TelemetryHandle};

/// Runs the worker with the parsed command line, mapping every failure to
/// an exit status and a message on stderr.
pub fn run(cli: Cli) -> ExitCode {
    let config = cli.into_config();
    if let Err(telemetry_error) = telemetry::initialise(&config) {
        eprintln!("sootherd: {telemetry_error}");
        return ExitCode::FAILURE;
    }

    match &config.endpoint {
        Some(endpoint) => match bridge::serve_until_shutdown(endpoint, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(serve_error) => {
                error!(error = %serve_error, "bridge mode failed");
                eprintln!("sootherd: {serve_error}");
                ExitCode::FAILURE
            }
        },
        None => {
            let processor = PayloadProcessor::new(config.policy);
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            match stdio::run_once(stdin, stdout, &processor) {
                Ok(()) => ExitCode::SUCCESS,
                Err(stdio_error) => {
                    error!(error = %stdio_error, "stdio mode failed");
                    eprintln!("sootherd: {stdio_error}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
