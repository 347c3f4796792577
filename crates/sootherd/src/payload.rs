//! Request and response payload model for the bridge protocol.
//!
//! Payloads are JSON objects. Only three keys carry meaning for the
//! worker; everything else passes through to the response untouched so the
//! host can round-trip its own bookkeeping.

use serde_json::{Map, Value};
use thiserror::Error;

/// Key marking a database-sourced request.
pub const CAMPAIGN_NAME_KEY: &str = "CampaignName";
/// Key marking a live-sourced request.
pub const PACIFIER_ID_KEY: &str = "PacifierId";
/// Key carrying the opaque pacifier detail list.
pub const PACIFIERS_KEY: &str = "Pacifiers";

/// Success marker set on processed responses.
pub const PROCESSED_KEY: &str = "processed";
/// Failure marker carrying a human-readable reason.
pub const ERROR_KEY: &str = "error";
/// Echoed length of the pacifier detail list.
pub const NUMBER_OF_PACIFIERS_KEY: &str = "NumberOfPacifiers";

/// Errors raised while decoding request bytes into a payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("request is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("request is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request JSON is not an object")]
    NotAnObject,
}

/// Origin of a payload, derived from its identifying key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Carries a campaign name; data was pulled from the database.
    Database,
    /// Carries a pacifier id; data arrived from a live sensor stream.
    Live,
}

/// Decoded request object.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    body: Map<String, Value>,
}

impl RequestPayload {
    /// Decodes raw request bytes into a payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_text(std::str::from_utf8(bytes)?)
    }

    /// Decodes request text into a payload.
    ///
    /// Anything other than a single JSON object is a decode failure; the
    /// identifying keys only exist on objects.
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(body) => Ok(Self { body }),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Classifies the payload by the identifying key it carries.
    ///
    /// Presence decides, not value shape: the campaign name wins over the
    /// pacifier id when both appear.
    #[must_use]
    pub fn source(&self) -> Option<PayloadSource> {
        if self.body.contains_key(CAMPAIGN_NAME_KEY) {
            Some(PayloadSource::Database)
        } else if self.body.contains_key(PACIFIER_ID_KEY) {
            Some(PayloadSource::Live)
        } else {
            None
        }
    }

    /// Length of the pacifier detail list, when one is attached.
    #[must_use]
    pub fn pacifier_count(&self) -> Option<usize> {
        self.body
            .get(PACIFIERS_KEY)
            .and_then(Value::as_array)
            .map(Vec::len)
    }

    pub(crate) fn into_body(self) -> Map<String, Value> {
        self.body
    }
}

/// Response object echoed to the host with exactly one outcome marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePayload {
    body: Map<String, Value>,
}

impl ResponsePayload {
    /// Builds a success response: the request body plus `processed = true`
    /// and, when a pacifier list was attached, its echoed length.
    #[must_use]
    pub fn processed(payload: RequestPayload) -> Self {
        let count = payload.pacifier_count();
        let mut body = payload.into_body();
        body.insert(PROCESSED_KEY.to_string(), Value::Bool(true));
        if let Some(count) = count {
            body.insert(NUMBER_OF_PACIFIERS_KEY.to_string(), Value::from(count));
        }
        Self { body }
    }

    /// Builds a failure response: the request body plus an `error` reason.
    #[must_use]
    pub fn rejected(payload: RequestPayload, reason: &str) -> Self {
        let mut body = payload.into_body();
        body.insert(ERROR_KEY.to_string(), Value::String(reason.to_string()));
        Self { body }
    }

    /// True when the response carries the success marker.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.body.get(PROCESSED_KEY) == Some(&Value::Bool(true))
    }

    /// The failure reason, when the response carries one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.body.get(ERROR_KEY).and_then(Value::as_str)
    }

    /// Serialises the response to its wire form.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.body)
    }
}
