//! Entry point for the telemetry worker binary.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    sootherd::run(sootherd::Cli::parse())
}
