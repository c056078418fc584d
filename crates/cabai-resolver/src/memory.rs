//! # In-Memory Record Source
//!
//! A fixed snapshot of records keyed by canonical identifier. Backs the CLI,
//! the API when configured with a JSON dataset file, and every test that
//! needs a deterministic source.
//!
//! The dataset format is a JSON array of traceability records. Identifiers
//! are parsed on load, so a dataset with a malformed identifier is rejected
//! as a whole rather than yielding an unreachable record.

use std::collections::HashMap;
use std::path::Path;

use cabai_core::TraceabilityRecord;

use crate::error::{DatasetError, SourceError};
use crate::source::RecordSource;

/// Immutable record snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: HashMap<String, TraceabilityRecord>,
}

impl InMemorySource {
    /// An empty source. Every lookup answers `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records, rejecting duplicate canonical identifiers.
    pub fn from_records(
        records: impl IntoIterator<Item = TraceabilityRecord>,
    ) -> Result<Self, DatasetError> {
        let mut map = HashMap::new();
        for record in records {
            let key = record.identifier.canonical();
            if map.contains_key(&key) {
                return Err(DatasetError::DuplicateIdentifier(key));
            }
            map.insert(key, record);
        }
        Ok(Self { records: map })
    }

    /// Parse a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<TraceabilityRecord> =
            serde_json::from_str(json).map_err(|source| DatasetError::Parse {
                origin: "<inline>".to_string(),
                source,
            })?;
        Self::from_records(records)
    }

    /// Load a JSON dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: origin.clone(),
            source,
        })?;
        let records: Vec<TraceabilityRecord> =
            serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
                origin: origin.clone(),
                source,
            })?;
        let source = Self::from_records(records)?;
        tracing::info!(path = %origin, records = source.len(), "loaded traceability dataset");
        Ok(source)
    }

    /// Record stored under `canonical_id`, as loaded (not normalized).
    pub fn get(&self, canonical_id: &str) -> Option<&TraceabilityRecord> {
        self.records.get(canonical_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for InMemorySource {
    async fn lookup(&self, canonical_id: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
        Ok(self.get(canonical_id).cloned())
    }
}
