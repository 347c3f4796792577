//! Structured records decoded from line-protocol text.

use std::collections::BTreeMap;

use serde::Serialize;

/// Keys routed into [`Record::tags`]; every other key becomes a field.
pub const TAG_KEYS: [&str; 4] = ["campaign_name", "pacifier_name", "sensor_type", "status"];

/// Returns true when the key belongs to the tag allow-list.
#[must_use]
pub fn is_tag_key(key: &str) -> bool {
    TAG_KEYS.contains(&key)
}

/// One decoded line-protocol entry.
///
/// Values are kept as trimmed strings; no numeric coercion happens at this
/// layer. Key order within the maps is irrelevant to consumers, so a sorted
/// map keeps serialised output deterministic.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Record {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub(crate) fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Stores a key/value pair, routing by the tag allow-list.
    pub(crate) fn insert(&mut self, key: &str, value: &str) {
        if is_tag_key(key) {
            self.tags.insert(key.to_string(), value.to_string());
        } else {
            self.fields.insert(key.to_string(), value.to_string());
        }
    }
}
