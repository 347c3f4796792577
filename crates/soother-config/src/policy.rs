use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Policy applied to payloads that carry neither a campaign name nor a
/// pacifier id.
///
/// Deployed workers disagreed on this case: one rejected such payloads with
/// an error marker, another marked them processed regardless. Both
/// behaviours remain reachable; the rejecting variant is the default.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValidationPolicy {
    /// Unidentified payloads are answered with an `error` marker.
    #[default]
    Strict,
    /// Unidentified payloads are marked processed anyway.
    Permissive,
}

/// Errors encountered while parsing a [`ValidationPolicy`] from text.
pub type ValidationPolicyParseError = strum::ParseError;
