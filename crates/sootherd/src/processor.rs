//! Pure transformation from request payloads to response payloads.

use tracing::debug;

use soother_config::ValidationPolicy;

use crate::payload::{RequestPayload, ResponsePayload};

const PROCESSOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::processor");

/// Reason reported for unidentified payloads under the strict policy.
pub const MISSING_IDENTIFIER_ERROR: &str = "Missing CampaignName";

/// Applies the validation policy and stamps the outcome marker.
///
/// Processing is deterministic: the same payload and policy always yield
/// the same response. Diagnostics are emitted through `tracing` and never
/// alter the returned object.
#[derive(Debug, Clone, Copy)]
pub struct PayloadProcessor {
    policy: ValidationPolicy,
}

impl PayloadProcessor {
    #[must_use]
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Processes one decoded request into its response.
    #[must_use]
    pub fn process(&self, payload: RequestPayload) -> ResponsePayload {
        match payload.source() {
            Some(source) => {
                debug!(target: PROCESSOR_TARGET, ?source, "payload identified");
                ResponsePayload::processed(payload)
            }
            None => match self.policy {
                ValidationPolicy::Strict => {
                    debug!(target: PROCESSOR_TARGET, "rejecting unidentified payload");
                    ResponsePayload::rejected(payload, MISSING_IDENTIFIER_ERROR)
                }
                ValidationPolicy::Permissive => ResponsePayload::processed(payload),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::payload::RequestPayload;

    fn request(value: serde_json::Value) -> RequestPayload {
        RequestPayload::from_text(&value.to_string()).expect("request should decode")
    }

    #[rstest]
    #[case::database(json!({"CampaignName": "Acme"}))]
    #[case::live(json!({"PacifierId": "Pacifier1"}))]
    fn identified_payloads_are_processed(#[case] body: serde_json::Value) {
        let processor = PayloadProcessor::new(ValidationPolicy::Strict);
        let response = processor.process(request(body));
        assert!(response.is_processed());
        assert_eq!(response.error(), None);
    }

    #[test]
    fn strict_policy_rejects_unidentified_payloads() {
        let processor = PayloadProcessor::new(ValidationPolicy::Strict);
        let response = processor.process(request(json!({"Data": [1]})));
        assert!(!response.is_processed());
        assert_eq!(response.error(), Some(MISSING_IDENTIFIER_ERROR));
    }

    #[test]
    fn permissive_policy_accepts_unidentified_payloads() {
        let processor = PayloadProcessor::new(ValidationPolicy::Permissive);
        let response = processor.process(request(json!({"Data": [1]})));
        assert!(response.is_processed());
        assert_eq!(response.error(), None);
    }

    #[test]
    fn processing_is_deterministic() {
        let processor = PayloadProcessor::new(ValidationPolicy::Strict);
        let body = json!({"CampaignName": "Acme", "Pacifiers": [{}, {}]});
        let first = processor.process(request(body.clone()));
        let second = processor.process(request(body));
        assert_eq!(first, second);
    }
}
