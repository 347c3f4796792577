//! Line-protocol parsing.
//!
//! A line is usable when it contains at least one comma and one equals
//! sign; anything else is skipped without aborting the batch. The first
//! comma-delimited token names the measurement, each later token splits on
//! its first equals sign into a key/value pair, and tokens without an
//! equals sign are dropped.

use tracing::debug;

use crate::record::Record;

const PARSER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::parser");

/// Parses one line, returning `None` for lines that carry no record.
#[must_use]
pub fn parse_line(line: &str) -> Option<Record> {
    let trimmed = line.trim();
    if !trimmed.contains(',') || !trimmed.contains('=') {
        if !trimmed.is_empty() {
            debug!(target: PARSER_TARGET, line = trimmed, "skipping malformed line");
        }
        return None;
    }

    let mut tokens = trimmed.split(',');
    let measurement = tokens.next()?;
    let mut record = Record::new(measurement);
    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            debug!(target: PARSER_TARGET, token, "discarding token without key/value shape");
            continue;
        };
        record.insert(key, value.trim());
    }
    Some(record)
}

/// Parses a batch of lines into records, preserving input order.
///
/// Lines never merge: a repeated measurement yields a fresh record each
/// time it appears.
pub fn parse_lines<'a, I>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(parse_line).collect()
}
