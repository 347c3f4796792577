//! Streams line-protocol sources into a sink.

use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::info;

use crate::parser::parse_line;
use crate::sink::{RecordSink, SinkError};

const INGEST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::ingest");

/// Errors that abort an ingest run.
///
/// Malformed lines are not errors; only the source or the sink failing
/// stops a run, and a stopped run makes no partial-output guarantee.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open line-protocol source '{path}': {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line-protocol source: {0}")]
    Read(#[source] std::io::Error),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Parses every line from the reader, delivering records to the sink.
///
/// Returns the number of records written.
pub fn ingest_reader<R: BufRead>(
    reader: R,
    sink: &mut dyn RecordSink,
) -> Result<usize, IngestError> {
    let mut written = 0_usize;
    for line in reader.lines() {
        let line = line.map_err(IngestError::Read)?;
        if let Some(record) = parse_line(&line) {
            sink.write_record(&record)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Opens a file and ingests it via [`ingest_reader`].
pub fn ingest_path(path: &Utf8Path, sink: &mut dyn RecordSink) -> Result<usize, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let written = ingest_reader(BufReader::new(file), sink)?;
    info!(target: INGEST_TARGET, path = %path, records = written, "ingest completed");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use camino::Utf8PathBuf;

    use super::*;
    use crate::record::Record;

    fn campaign_file(dir: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = dir.path().join("campaign.txt");
        let mut file = File::create(&path).expect("create campaign file");
        file.write_all(content.as_bytes()).expect("write campaign file");
        Utf8PathBuf::from_path_buf(path).expect("utf8 path")
    }

    #[test]
    fn ingests_valid_lines_and_skips_the_rest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = campaign_file(
            &dir,
            "campaign_metadata,campaign_name=C1,status=created\n\
             junk line\n\
             campaigns,campaign_name=C1,pacifier_name=P1,led1=103\n",
        );

        let mut sink: Vec<Record> = Vec::new();
        let written = ingest_path(&path, &mut sink).expect("ingest should succeed");
        assert_eq!(written, 2);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].tags.get("pacifier_name").map(String::as_str), Some("P1"));
    }

    #[test]
    fn missing_source_is_fatal() {
        let mut sink: Vec<Record> = Vec::new();
        let error = ingest_path(Utf8Path::new("/nonexistent/campaign.txt"), &mut sink)
            .expect_err("missing file should fail");
        assert!(matches!(error, IngestError::Open { .. }));
        assert!(sink.is_empty());
    }
}
