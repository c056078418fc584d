//! Resolver error types.
//!
//! [`SourceError`] covers every way the record source can fail to give an
//! answer. [`ResolveError`] is what the resolver hands the engine: either a
//! definitive "no such record" or a source failure. The two are kept apart
//! so a timeout can never be mistaken for a counterfeit.

use thiserror::Error;

/// The record source could not produce an authoritative answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The lookup did not complete within its deadline.
    #[error("record source did not answer within {elapsed_ms}ms")]
    Timeout {
        /// The deadline that elapsed, in milliseconds.
        elapsed_ms: u64,
    },

    /// The source is unreachable or failed server-side.
    #[error("record source unavailable: {reason}")]
    Unavailable {
        /// Transport or server diagnostic.
        reason: String,
    },

    /// The source refused the lookup (non-404 client error).
    #[error("record source rejected the lookup with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the source.
        status: u16,
    },

    /// The source answered with a payload that is not a valid record.
    #[error("record source returned an invalid record: {reason}")]
    InvalidPayload {
        /// Deserialization diagnostic.
        reason: String,
    },

    /// The source answered with a record for a different identifier.
    #[error("record source returned {returned} when asked for {requested}")]
    Inconsistent {
        /// Canonical identifier that was looked up.
        requested: String,
        /// Canonical identifier carried by the returned record.
        returned: String,
    },
}

/// Failure to resolve an identifier to a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The source answered and holds no record for the identifier.
    #[error("no traceability record for {0}")]
    NotFound(String),

    /// The source could not answer.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failure to load a JSON dataset into an in-memory source.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of valid records.
    #[error("invalid dataset {origin}: {source}")]
    Parse {
        /// File path, or `<inline>` for in-memory JSON.
        origin: String,
        source: serde_json::Error,
    },

    /// Two records share the same canonical identifier.
    #[error("duplicate record for identifier {0}")]
    DuplicateIdentifier(String),
}
