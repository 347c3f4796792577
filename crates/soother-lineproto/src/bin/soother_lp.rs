//! Converts campaign line-protocol data into JSON-lines records.
//!
//! Reads a line-protocol file (or stdin when the input is `-`) and writes
//! one JSON object per record to the output path, or to stdout when no
//! output is given.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use soother_lineproto::{IngestError, JsonLinesSink, SinkError, ingest_path, ingest_reader};

#[derive(Debug, Parser)]
#[command(name = "soother-lp", version, about = "Convert campaign line-protocol data into JSON records")]
struct Cli {
    /// Line-protocol input file; `-` reads from standard input.
    input: Utf8PathBuf,
    /// Destination for JSON-lines records; defaults to standard output.
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_telemetry();
    match run(&cli) {
        Ok(records) => {
            eprintln!("soother-lp: wrote {records} record(s)");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("soother-lp: {error}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Error)]
enum LpError {
    #[error("failed to create output file '{path}': {source}")]
    CreateOutput {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

fn run(cli: &Cli) -> Result<usize, LpError> {
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).map_err(|source| LpError::CreateOutput {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = JsonLinesSink::new(writer);

    let written = if cli.input.as_str() == "-" {
        ingest_reader(io::stdin().lock(), &mut sink)?
    } else {
        ingest_path(&cli.input, &mut sink)?
    };
    sink.flush()?;
    Ok(written)
}

fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
