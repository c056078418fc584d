//! # Record Cache
//!
//! An optional TTL cache in front of any [`RecordSource`].
//!
//! ## Security Invariant
//!
//! A cached record is never served once it is older than the TTL, and only
//! successful hits are cached. A "not found" or a source failure always goes
//! back to the source on the next lookup, so a revocation published upstream
//! becomes visible within one TTL. The cache stores records only, never
//! verdicts: expiry policy is re-evaluated on every verification.

use std::time::Duration;

use cabai_core::TraceabilityRecord;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::error::SourceError;
use crate::source::RecordSource;

#[derive(Debug, Clone)]
struct CacheEntry {
    record: TraceabilityRecord,
    stored_at: Instant,
}

/// TTL cache wrapping a record source. A zero TTL disables caching.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    /// A pass-through wrapper that never caches.
    pub fn disabled(inner: S) -> Self {
        Self::new(inner, Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of entries currently held, including stale ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the cached record for one identifier.
    pub fn invalidate(&self, canonical_id: &str) {
        self.entries.remove(canonical_id);
    }

    /// Drop every cached record.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn fresh(&self, canonical_id: &str) -> Option<TraceabilityRecord> {
        if let Some(entry) = self.entries.get(canonical_id) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.record.clone());
            }
        }
        self.entries
            .remove_if(canonical_id, |_, entry| entry.stored_at.elapsed() >= self.ttl);
        None
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    async fn lookup(&self, canonical_id: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
        if !self.is_enabled() {
            return self.inner.lookup(canonical_id).await;
        }

        if let Some(record) = self.fresh(canonical_id) {
            tracing::debug!(identifier = canonical_id, "record cache hit");
            return Ok(Some(record));
        }

        tracing::debug!(identifier = canonical_id, "record cache miss");
        let found = self.inner.lookup(canonical_id).await?;
        if let Some(record) = &found {
            self.entries.insert(
                canonical_id.to_string(),
                CacheEntry {
                    record: record.clone(),
                    stored_at: Instant::now(),
                },
            );
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabai_core::{Grade, ProductIdentifier, RecordStatus};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    const ID: &str = "CHI-H001-B001-20260102";

    fn record(status: RecordStatus) -> TraceabilityRecord {
        TraceabilityRecord {
            identifier: ProductIdentifier::parse(ID).unwrap(),
            grade: Grade::A,
            farm_origin: "Garut, Jawa Barat".to_string(),
            farmer_name: None,
            harvest_date: None,
            weight_kg: None,
            production_timeline: vec![],
            certifications: vec![],
            status,
        }
    }

    /// Source whose answer can be swapped and whose calls are counted.
    struct Scripted {
        answer: Mutex<Option<TraceabilityRecord>>,
        failing: AtomicBool,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(answer: Option<TraceabilityRecord>) -> Self {
            Self {
                answer: Mutex::new(answer),
                failing: AtomicBool::new(false),
                calls: AtomicU32::new(0),
            }
        }

        fn set(&self, answer: Option<TraceabilityRecord>) {
            *self.answer.lock().unwrap() = answer;
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RecordSource for Scripted {
        async fn lookup(&self, _: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(SourceError::Unavailable {
                    reason: "down".to_string(),
                });
            }
            Ok(self.answer.lock().unwrap().clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hit_is_served_from_cache_within_ttl() {
        let cache = CachedSource::new(
            Scripted::new(Some(record(RecordStatus::Active))),
            Duration::from_secs(60),
        );

        assert!(cache.lookup(ID).await.unwrap().is_some());
        assert!(cache.lookup(ID).await.unwrap().is_some());
        assert_eq!(cache.inner().calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn revocation_visible_after_ttl() {
        let cache = CachedSource::new(
            Scripted::new(Some(record(RecordStatus::Active))),
            Duration::from_secs(60),
        );
        cache.lookup(ID).await.unwrap();

        cache.inner().set(Some(record(RecordStatus::Revoked)));
        tokio::time::advance(Duration::from_secs(59)).await;
        let stale_ok = cache.lookup(ID).await.unwrap().unwrap();
        assert_eq!(stale_ok.status, RecordStatus::Active);

        tokio::time::advance(Duration::from_secs(2)).await;
        let fresh = cache.lookup(ID).await.unwrap().unwrap();
        assert_eq!(fresh.status, RecordStatus::Revoked);
        assert_eq!(cache.inner().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn misses_are_not_cached() {
        let cache = CachedSource::new(Scripted::new(None), Duration::from_secs(60));
        assert!(cache.lookup(ID).await.unwrap().is_none());
        assert!(cache.is_empty());

        cache.inner().set(Some(record(RecordStatus::Active)));
        assert!(cache.lookup(ID).await.unwrap().is_some());
        assert_eq!(cache.inner().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_not_cached() {
        let cache = CachedSource::new(
            Scripted::new(Some(record(RecordStatus::Active))),
            Duration::from_secs(60),
        );
        cache.inner().failing.store(true, Ordering::SeqCst);
        assert!(cache.lookup(ID).await.is_err());
        assert!(cache.is_empty());

        cache.inner().failing.store(false, Ordering::SeqCst);
        assert!(cache.lookup(ID).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn zero_ttl_is_pass_through() {
        let cache = CachedSource::disabled(Scripted::new(Some(record(RecordStatus::Active))));
        assert!(!cache.is_enabled());
        cache.lookup(ID).await.unwrap();
        cache.lookup(ID).await.unwrap();
        assert_eq!(cache.inner().calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refetch() {
        let cache = CachedSource::new(
            Scripted::new(Some(record(RecordStatus::Active))),
            Duration::from_secs(60),
        );
        cache.lookup(ID).await.unwrap();
        cache.invalidate(ID);
        cache.lookup(ID).await.unwrap();
        assert_eq!(cache.inner().calls(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
