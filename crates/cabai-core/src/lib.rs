//! # cabai-core — Foundational Types for Cabai Trace
//!
//! This crate defines the domain primitives every other Cabai Trace crate
//! builds on. It performs no I/O and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One grammar.** The product identifier grammar lives in [`schema`]
//!    and nowhere else. The parser, the record model and the serde boundary
//!    all route through it.
//!
//! 2. **Parse, don't validate.** A [`ProductIdentifier`] can only be built
//!    by the parser. Downstream code that holds one never re-checks it.
//!
//! 3. **Structured failures.** [`ParseError`] names the failing segment and
//!    the concrete reason; it is plain data that travels inside verdicts.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] is the single time type used
//!    for the verification moment and production timeline events.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cabai-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identifier;
pub mod parser;
pub mod record;
pub mod schema;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{CharClass, MalformedReason, ParseError, Segment, ValidationError};
pub use identifier::ProductIdentifier;
pub use parser::parse;
pub use record::{Certification, Grade, RecordStatus, TimelineEvent, TraceabilityRecord};
pub use temporal::Timestamp;
