//! Line-protocol decoding for campaign telemetry.
//!
//! Campaign files store one measurement per line as
//! `measurement,key1=value1,key2=value2,...`. The parser turns each valid
//! line into a [`Record`], routing a fixed set of well-known keys into tags
//! and everything else into fields. Malformed lines are skipped so one bad
//! entry never poisons a batch; only a failure to read the source itself
//! aborts a run.
//!
//! Parsed records are delivered to a caller-supplied [`RecordSink`], never
//! to a baked-in location. [`JsonLinesSink`] covers the common case of
//! writing one JSON object per line to any `Write` destination.

mod ingest;
mod parser;
mod record;
mod sink;

pub use ingest::{IngestError, ingest_path, ingest_reader};
pub use parser::{parse_line, parse_lines};
pub use record::{Record, TAG_KEYS, is_tag_key};
pub use sink::{JsonLinesSink, RecordSink, SinkError};
