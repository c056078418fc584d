//! User-facing guidance text for each verdict.
//!
//! Not-found, revoked and expired each get distinct distrust wording. Source
//! unavailability gets a retry prompt and never implies counterfeiting.

use cabai_core::{ParseError, RecordStatus, Segment};

use crate::result::VerificationResult;

/// Guidance for a verdict.
pub fn message(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Valid { record } => {
            let mut text = format!(
                "Authentic product. Grown in {}, grade {}.",
                record.farm_origin, record.grade
            );
            if record.status == RecordStatus::Superseded {
                text.push_str(" A newer record has since been issued for this product line.");
            }
            text
        }
        VerificationResult::Malformed { reason } => malformed_hint(reason).to_string(),
        VerificationResult::NotFound { identifier } => format!(
            "Product code {identifier} is not registered. This product may be counterfeit; \
             do not rely on its origin claims."
        ),
        VerificationResult::Revoked { record } => format!(
            "The traceability record for {} has been revoked. Do not trust this product.",
            record.identifier
        ),
        VerificationResult::Expired { expired_refs, .. } => format!(
            "This product is registered, but its certification has expired ({}). \
             Its certification claims can no longer be trusted.",
            expired_refs.join(", ")
        ),
        VerificationResult::SourceUnavailable { .. } => {
            "Verification is temporarily unavailable. This does not mean the product is \
             counterfeit. Please try again in a moment."
                .to_string()
        }
    }
}

/// How to fix a malformed identifier, specific to the failing segment.
pub fn malformed_hint(reason: &ParseError) -> &'static str {
    match reason.segment() {
        None => "Enter the product code printed on the label, for example CHI-H001-B001-20260102.",
        Some(Segment::Identifier) => {
            "A product code has four parts separated by dashes, for example CHI-H001-B001-20260102."
        }
        Some(Segment::ProductClass) => {
            "The first part of the code must be three letters, for example CHI."
        }
        Some(Segment::HarvestCode) => {
            "The second part of the code (harvest code) must be one letter followed by three digits, for example H001."
        }
        Some(Segment::BatchCode) => {
            "The third part of the code (batch code) must be one letter followed by three digits, for example B001."
        }
        Some(Segment::IssueDate) => {
            "The last part of the code must be a real date written as YYYYMMDD, for example 20260102."
        }
    }
}
