//! Caller-supplied destinations for parsed records.

use std::io::Write;

use thiserror::Error;

use crate::record::Record;

/// Errors raised while delivering a record to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialise record: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for parsed records.
pub trait RecordSink {
    fn write_record(&mut self, record: &Record) -> Result<(), SinkError>;
}

impl RecordSink for Vec<Record> {
    fn write_record(&mut self, record: &Record) -> Result<(), SinkError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Sink writing one JSON object per line to any `Write` destination.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes buffered output without consuming the sink.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, record: &Record) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
