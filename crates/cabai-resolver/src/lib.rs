//! # cabai-resolver — Traceability Record Resolution
//!
//! Resolves a parsed product identifier to its traceability record.
//!
//! - [`RecordSource`]: the read-only lookup interface every backing store
//!   implements.
//! - [`InMemorySource`]: fixed snapshot, loaded from a JSON dataset.
//! - [`HttpSource`]: remote traceability API.
//! - [`CachedSource`]: optional TTL cache in front of any source.
//! - [`RecordResolver`]: deadline-bounded lookup plus record normalization.
//!
//! ## Failure Taxonomy
//!
//! A lookup ends in exactly one of: a record, [`ResolveError::NotFound`]
//! (the source answered "no"), or [`ResolveError::Source`] (the source could
//! not answer). Timeouts and connectivity failures are always the latter.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod resolver;
pub(crate) mod retry;
pub mod source;

pub use cache::CachedSource;
pub use config::{ConfigError, ConfiguredSource, ResolverConfig, SourceSpec};
pub use error::{DatasetError, ResolveError, SourceError};
pub use http::{HttpSource, HttpSourceConfig};
pub use memory::InMemorySource;
pub use resolver::{RecordResolver, DEFAULT_LOOKUP_TIMEOUT};
pub use source::RecordSource;
