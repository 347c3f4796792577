//! One-shot stdio processing mode.
//!
//! Without a port argument the worker reads a single JSON request from its
//! input stream to end-of-stream, processes it, and writes the response to
//! the output stream followed by a newline. An empty input stream is a
//! hard failure, not a silent success.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::debug;

use crate::payload::{DecodeError, RequestPayload};
use crate::processor::PayloadProcessor;

const STDIO_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::stdio");

/// Errors that terminate a stdio-mode run.
#[derive(Debug, Error)]
pub enum StdioError {
    #[error("no input data received")]
    EmptyInput,
    #[error("failed to read input stream: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to decode request: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to serialise response: {0}")]
    Serialise(#[source] serde_json::Error),
    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),
}

/// Reads one request from `input`, writes one response to `output`.
///
/// Nothing is written to `output` unless processing succeeds, so a failed
/// run never leaves a partial response on the stream.
pub fn run_once<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    processor: &PayloadProcessor,
) -> Result<(), StdioError> {
    let mut text = String::new();
    input.read_to_string(&mut text).map_err(StdioError::Read)?;
    if text.trim().is_empty() {
        return Err(StdioError::EmptyInput);
    }

    let payload = RequestPayload::from_text(&text)?;
    let response = processor.process(payload);
    let wire = response.to_vec().map_err(StdioError::Serialise)?;

    output.write_all(&wire).map_err(StdioError::Write)?;
    output.write_all(b"\n").map_err(StdioError::Write)?;
    output.flush().map_err(StdioError::Write)?;
    debug!(target: STDIO_TARGET, bytes = wire.len(), "stdio request answered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::json;

    use soother_config::ValidationPolicy;

    use super::*;

    fn processor() -> PayloadProcessor {
        PayloadProcessor::new(ValidationPolicy::Strict)
    }

    #[test]
    fn answers_a_campaign_request() {
        let mut output = Vec::new();
        run_once(
            Cursor::new(r#"{"CampaignName":"Acme"}"#),
            &mut output,
            &processor(),
        )
        .expect("run should succeed");

        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.ends_with('\n'));
        let wire: serde_json::Value = serde_json::from_str(text.trim()).expect("json output");
        assert_eq!(wire, json!({"CampaignName": "Acme", "processed": true}));
    }

    #[test]
    fn empty_input_fails_without_writing() {
        let mut output = Vec::new();
        let error = run_once(Cursor::new(""), &mut output, &processor())
            .expect_err("empty input should fail");
        assert!(matches!(error, StdioError::EmptyInput));
        assert!(output.is_empty());
    }

    #[test]
    fn whitespace_only_input_counts_as_empty() {
        let mut output = Vec::new();
        let error = run_once(Cursor::new("  \n"), &mut output, &processor())
            .expect_err("blank input should fail");
        assert!(matches!(error, StdioError::EmptyInput));
        assert!(output.is_empty());
    }

    #[test]
    fn malformed_input_fails_without_writing() {
        let mut output = Vec::new();
        let error = run_once(Cursor::new("{not json"), &mut output, &processor())
            .expect_err("garbage should fail");
        assert!(matches!(error, StdioError::Decode(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn non_object_input_fails() {
        let mut output = Vec::new();
        let error = run_once(Cursor::new("[1,2]"), &mut output, &processor())
            .expect_err("array should fail");
        assert!(matches!(error, StdioError::Decode(DecodeError::NotAnObject)));
    }
}
