//! # Verification Result
//!
//! The single outcome of verifying one raw identifier. Pure data: it carries
//! the record snapshot it was decided on, so a presentation layer never has
//! to go back to the source.
//!
//! Serialized as JSON tagged by `verdict`:
//!
//! ```json
//! {"verdict": "expired", "record": {...}, "expired_refs": ["ORG-1"]}
//! ```

use cabai_core::{ParseError, ProductIdentifier, TraceabilityRecord};
use serde::{Deserialize, Serialize};

/// Outcome of a verification. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Registered, not revoked, no expired certification.
    Valid { record: TraceabilityRecord },

    /// The input is not a well-formed identifier. The source was not queried.
    Malformed { reason: ParseError },

    /// Well-formed but unregistered.
    NotFound { identifier: ProductIdentifier },

    /// The record exists and has been revoked.
    Revoked { record: TraceabilityRecord },

    /// The record exists and at least one certification has expired.
    Expired {
        record: TraceabilityRecord,
        /// References of the expired certifications, in record order.
        expired_refs: Vec<String>,
    },

    /// The source could not answer. Retryable; says nothing about the product.
    SourceUnavailable { identifier: ProductIdentifier },
}

/// Fieldless view of a [`VerificationResult`], for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Malformed,
    NotFound,
    Revoked,
    Expired,
    SourceUnavailable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Malformed => "malformed",
            Self::NotFound => "not_found",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::SourceUnavailable => "source_unavailable",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VerificationResult {
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Valid { .. } => Verdict::Valid,
            Self::Malformed { .. } => Verdict::Malformed,
            Self::NotFound { .. } => Verdict::NotFound,
            Self::Revoked { .. } => Verdict::Revoked,
            Self::Expired { .. } => Verdict::Expired,
            Self::SourceUnavailable { .. } => Verdict::SourceUnavailable,
        }
    }

    /// Only a `Valid` verdict establishes trust in the product.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Whether asking again later may produce a different verdict.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }

    /// The record snapshot the verdict was decided on, if any.
    pub fn record(&self) -> Option<&TraceabilityRecord> {
        match self {
            Self::Valid { record } | Self::Revoked { record } | Self::Expired { record, .. } => {
                Some(record)
            }
            Self::Malformed { .. } | Self::NotFound { .. } | Self::SourceUnavailable { .. } => None,
        }
    }

    /// The parsed identifier, if the input was well-formed.
    pub fn identifier(&self) -> Option<&ProductIdentifier> {
        match self {
            Self::NotFound { identifier } | Self::SourceUnavailable { identifier } => {
                Some(identifier)
            }
            Self::Malformed { .. } => None,
            _ => self.record().map(|r| &r.identifier),
        }
    }

    /// User-facing guidance for this verdict.
    pub fn guidance(&self) -> String {
        crate::guidance::message(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabai_core::{Grade, RecordStatus};

    fn record() -> TraceabilityRecord {
        TraceabilityRecord {
            identifier: ProductIdentifier::parse("CHI-H001-B001-20260102").unwrap(),
            grade: Grade::A,
            farm_origin: "Garut, Jawa Barat".to_string(),
            farmer_name: None,
            harvest_date: None,
            weight_kg: Some(10.0),
            production_timeline: vec![],
            certifications: vec![],
            status: RecordStatus::Active,
        }
    }

    #[test]
    fn serializes_with_verdict_tag() {
        let result = VerificationResult::Expired {
            record: record(),
            expired_refs: vec!["ORG-1".to_string()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["verdict"], "expired");
        assert_eq!(json["record"]["identifier"], "CHI-H001-B001-20260102");
        assert_eq!(json["expired_refs"][0], "ORG-1");

        let back: VerificationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn malformed_carries_structured_reason() {
        let reason = cabai_core::parse("chi-1-2-3").unwrap_err();
        let json = serde_json::to_value(VerificationResult::Malformed { reason }).unwrap();
        assert_eq!(json["verdict"], "malformed");
        assert_eq!(json["reason"]["segment"], "harvest_code");
        assert_eq!(json["reason"]["reason"]["kind"], "length");
    }

    #[test]
    fn accessors() {
        let valid = VerificationResult::Valid { record: record() };
        assert!(valid.is_trusted());
        assert!(!valid.is_retryable());
        assert_eq!(valid.identifier().unwrap().canonical(), "CHI-H001-B001-20260102");

        let down = VerificationResult::SourceUnavailable {
            identifier: ProductIdentifier::parse("CHI-H001-B001-20260102").unwrap(),
        };
        assert!(!down.is_trusted());
        assert!(down.is_retryable());
        assert!(down.record().is_none());
        assert_eq!(down.verdict().to_string(), "source_unavailable");
    }
}
