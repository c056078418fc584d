//! # cabai-verify — Product Verification
//!
//! The engine that answers "is this product what it claims to be?" for a
//! raw identifier typed by a user or decoded from a QR label.
//!
//! ```text
//! raw string ─► parse ─► resolve ─► policy ─► VerificationResult
//!                 │         │          │
//!             Malformed  NotFound   Revoked / Expired / Valid
//!                     SourceUnavailable
//! ```
//!
//! The record source and the clock are injected, so the engine carries no
//! global state and its verdicts are reproducible in tests.

pub mod clock;
pub mod engine;
pub mod guidance;
pub mod result;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{evaluate, VerificationEngine};
pub use result::{Verdict, VerificationResult};
