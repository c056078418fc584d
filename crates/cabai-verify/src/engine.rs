//! # Verification Engine
//!
//! Parse, resolve, then apply trust policy:
//!
//! 1. Unparseable input → `Malformed`. The source is never queried.
//! 2. No record → `NotFound`. Source failure → `SourceUnavailable`.
//! 3. First failing check wins: revoked status → `Revoked`; any
//!    certification expired at the verification moment → `Expired`;
//!    otherwise `Valid`.
//!
//! The engine holds no mutable state. For a fixed input, record snapshot
//! and moment the verdict is deterministic, and `verify` never panics or
//! returns an error: every failure is a verdict.

use cabai_core::{RecordStatus, Timestamp, TraceabilityRecord};
use cabai_resolver::{RecordResolver, RecordSource, ResolveError};

use crate::clock::{Clock, SystemClock};
use crate::result::VerificationResult;

/// Turns raw identifier text into a [`VerificationResult`].
#[derive(Debug, Clone)]
pub struct VerificationEngine<S, C = SystemClock> {
    resolver: RecordResolver<S>,
    clock: C,
}

impl<S: RecordSource> VerificationEngine<S, SystemClock> {
    /// Engine reading the verification moment from the system clock.
    pub fn new(resolver: RecordResolver<S>) -> Self {
        Self::with_clock(resolver, SystemClock)
    }
}

impl<S: RecordSource, C: Clock> VerificationEngine<S, C> {
    pub fn with_clock(resolver: RecordResolver<S>, clock: C) -> Self {
        Self { resolver, clock }
    }

    pub fn resolver(&self) -> &RecordResolver<S> {
        &self.resolver
    }

    /// Verify `raw` at the clock's current moment.
    pub async fn verify(&self, raw: &str) -> VerificationResult {
        self.verify_at(raw, self.clock.now()).await
    }

    /// Verify `raw` at an explicit moment.
    pub async fn verify_at(&self, raw: &str, moment: Timestamp) -> VerificationResult {
        let id = match cabai_core::parse(raw) {
            Ok(id) => id,
            Err(reason) => {
                // Unparsed input, or any fragment of it, never reaches logs.
                tracing::debug!(
                    input_len = raw.len(),
                    segment = reason.segment().map_or("none", |s| s.as_str()),
                    kind = reason.kind(),
                    "malformed identifier"
                );
                return VerificationResult::Malformed { reason };
            }
        };

        let result = match self.resolver.resolve(&id).await {
            Ok(record) => evaluate(record, &moment),
            Err(ResolveError::NotFound(_)) => VerificationResult::NotFound { identifier: id },
            Err(ResolveError::Source(e)) => {
                tracing::warn!(identifier = %id, error = %e, "record source unavailable");
                VerificationResult::SourceUnavailable { identifier: id }
            }
        };

        tracing::debug!(
            identifier = ?result.identifier().map(ToString::to_string),
            verdict = %result.verdict(),
            moment = %moment,
            "verification complete"
        );
        result
    }
}

/// Apply trust policy to a resolved record at `moment`.
///
/// Revocation is checked before expiry. Grade never affects the outcome.
pub fn evaluate(record: TraceabilityRecord, moment: &Timestamp) -> VerificationResult {
    if record.status == RecordStatus::Revoked {
        return VerificationResult::Revoked { record };
    }
    let expired_refs = record.expired_certifications(moment);
    if !expired_refs.is_empty() {
        return VerificationResult::Expired {
            record,
            expired_refs,
        };
    }
    VerificationResult::Valid { record }
}
