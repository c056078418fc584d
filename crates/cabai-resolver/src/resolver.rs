//! # Record Resolver
//!
//! Turns a parsed [`ProductIdentifier`] into a normalized
//! [`TraceabilityRecord`] by querying a [`RecordSource`] under a deadline.
//!
//! ## Security Invariant
//!
//! The resolver only ever returns a record whose identifier equals the one
//! requested. A source that answers with a different record is treated as
//! faulty ([`SourceError::Inconsistent`]), never as a match.

use std::time::Duration;

use cabai_core::{ProductIdentifier, TraceabilityRecord};

use crate::error::{ResolveError, SourceError};
use crate::source::RecordSource;

/// Default per-lookup deadline.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline-bounded, normalizing front end to a record source.
#[derive(Debug, Clone)]
pub struct RecordResolver<S> {
    source: S,
    deadline: Duration,
}

impl<S: RecordSource> RecordResolver<S> {
    /// Resolver with the default 5 second deadline.
    pub fn new(source: S) -> Self {
        Self::with_deadline(source, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_deadline(source: S, deadline: Duration) -> Self {
        Self { source, deadline }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Resolve `id` to its normalized record.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] when the source holds no record.
    /// - [`ResolveError::Source`] on timeout, source failure, or a record
    ///   for a different identifier.
    pub async fn resolve(
        &self,
        id: &ProductIdentifier,
    ) -> Result<TraceabilityRecord, ResolveError> {
        let key = id.canonical();
        tracing::debug!(identifier = %key, "resolving traceability record");

        let answer = match tokio::time::timeout(self.deadline, self.source.lookup(&key)).await {
            Ok(answer) => answer,
            Err(_) => {
                let elapsed_ms = u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(identifier = %key, elapsed_ms, "record source lookup timed out");
                return Err(SourceError::Timeout { elapsed_ms }.into());
            }
        };

        let record = match answer {
            Ok(Some(record)) => record,
            Ok(None) => return Err(ResolveError::NotFound(key)),
            Err(e) => {
                tracing::warn!(identifier = %key, error = %e, "record source lookup failed");
                return Err(e.into());
            }
        };

        if record.identifier != *id {
            let returned = record.identifier.canonical();
            tracing::error!(
                identifier = %key,
                returned = %returned,
                "record source returned a record for a different identifier"
            );
            return Err(SourceError::Inconsistent {
                requested: key,
                returned,
            }
            .into());
        }

        Ok(record.into_normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySource;
    use cabai_core::{Certification, Grade, RecordStatus, TimelineEvent, Timestamp};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn id(s: &str) -> ProductIdentifier {
        ProductIdentifier::parse(s).unwrap()
    }

    fn record(identifier: &str) -> TraceabilityRecord {
        TraceabilityRecord {
            identifier: id(identifier),
            grade: Grade::A,
            farm_origin: "Garut, Jawa Barat".to_string(),
            farmer_name: None,
            harvest_date: None,
            weight_kg: None,
            production_timeline: vec![],
            certifications: vec![],
            status: RecordStatus::Active,
        }
    }

    fn cert(reference: &str, expires_on: &str) -> Certification {
        Certification {
            reference: reference.to_string(),
            issuer: None,
            expires_on: NaiveDate::parse_from_str(expires_on, "%Y-%m-%d").unwrap(),
        }
    }

    fn event(at: &str, stage: &str) -> TimelineEvent {
        TimelineEvent {
            at: Timestamp::parse(at).unwrap(),
            stage: stage.to_string(),
            description: None,
            icon: None,
        }
    }

    /// Answers with a fixed record regardless of the key asked for.
    struct Liar(TraceabilityRecord);

    impl RecordSource for Liar {
        async fn lookup(&self, _: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
            Ok(Some(self.0.clone()))
        }
    }

    /// Hangs while `stalled` is set, otherwise delegates.
    struct Stalling {
        stalled: AtomicBool,
        inner: InMemorySource,
    }

    impl RecordSource for Stalling {
        async fn lookup(&self, key: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
            if self.stalled.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.inner.lookup(key).await
        }
    }

    #[tokio::test]
    async fn resolves_known_identifier() {
        let source = InMemorySource::from_records([record("CHI-H001-B001-20260102")]).unwrap();
        let resolver = RecordResolver::new(source);
        let found = resolver.resolve(&id("chi-H001-B001-20260102")).await.unwrap();
        assert_eq!(found.identifier.canonical(), "CHI-H001-B001-20260102");
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let resolver = RecordResolver::new(InMemorySource::new());
        let err = resolver.resolve(&id("CHI-H999-B999-20991231")).await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("CHI-H999-B999-20991231".to_string()));
    }

    #[tokio::test]
    async fn record_for_other_identifier_is_inconsistent() {
        let resolver = RecordResolver::new(Liar(record("CHI-H002-B001-20260102")));
        let err = resolver.resolve(&id("CHI-H001-B001-20260102")).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Source(SourceError::Inconsistent { ref requested, ref returned })
                if requested == "CHI-H001-B001-20260102" && returned == "CHI-H002-B001-20260102"
        ));
    }

    #[tokio::test]
    async fn case_variant_record_is_inconsistent() {
        let resolver = RecordResolver::new(Liar(record("CHI-h001-B001-20260102")));
        let err = resolver.resolve(&id("CHI-H001-B001-20260102")).await.unwrap_err();
        assert!(matches!(err, ResolveError::Source(SourceError::Inconsistent { .. })));
    }

    #[tokio::test]
    async fn normalizes_timeline_and_certifications() {
        let mut r = record("CHI-H001-B001-20260102");
        r.production_timeline = vec![
            event("2026-01-02T00:00:00Z", "Packing"),
            event("2025-09-01T00:00:00Z", "Planting"),
        ];
        r.certifications = vec![
            cert("ORG-1", "2027-06-30"),
            cert("ORG-1", "2026-06-30"),
        ];
        let resolver = RecordResolver::new(InMemorySource::from_records([r]).unwrap());
        let found = resolver.resolve(&id("CHI-H001-B001-20260102")).await.unwrap();

        assert!(found.is_timeline_ordered());
        assert_eq!(found.production_timeline[0].stage, "Planting");
        assert_eq!(found.certifications.len(), 1);
        assert_eq!(found.certifications[0].expires_on.to_string(), "2026-06-30");
    }

    #[tokio::test]
    async fn deadline_elapsing_is_timeout_then_recovers() {
        let source = Arc::new(Stalling {
            stalled: AtomicBool::new(true),
            inner: InMemorySource::from_records([record("CHI-H001-B001-20260102")]).unwrap(),
        });
        let resolver = RecordResolver::with_deadline(source.clone(), Duration::from_millis(50));

        let err = resolver.resolve(&id("CHI-H001-B001-20260102")).await.unwrap_err();
        assert_eq!(err, ResolveError::Source(SourceError::Timeout { elapsed_ms: 50 }));

        source.stalled.store(false, Ordering::SeqCst);
        assert!(resolver.resolve(&id("CHI-H001-B001-20260102")).await.is_ok());
    }

    #[test]
    fn default_deadline_is_five_seconds() {
        let resolver = RecordResolver::new(InMemorySource::new());
        assert_eq!(resolver.deadline(), Duration::from_secs(5));
    }
}
