//! # Record Source Interface
//!
//! The seam between the engine and wherever traceability records live.
//! Implementations are read-only from the engine's point of view and must
//! be shareable across concurrent verifications.
//!
//! ## Contract
//!
//! - `Ok(Some(record))`: the source holds a record for the key.
//! - `Ok(None)`: the source answered and holds no record. Terminal.
//! - `Err(_)`: the source could not answer. Transient; never a "not found".
//!
//! Lookup is by exact canonical string. Implementations must not perform
//! fuzzy, prefix or case-folded matching.

use std::future::Future;
use std::sync::Arc;

use cabai_core::TraceabilityRecord;

use crate::error::SourceError;

/// Read-only lookup of traceability records by canonical identifier.
pub trait RecordSource: Send + Sync {
    /// Look up the record stored under `canonical_id`.
    fn lookup(
        &self,
        canonical_id: &str,
    ) -> impl Future<Output = Result<Option<TraceabilityRecord>, SourceError>> + Send;
}

impl<S: RecordSource> RecordSource for Arc<S> {
    fn lookup(
        &self,
        canonical_id: &str,
    ) -> impl Future<Output = Result<Option<TraceabilityRecord>, SourceError>> + Send {
        (**self).lookup(canonical_id)
    }
}
