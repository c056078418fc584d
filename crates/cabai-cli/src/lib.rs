//! # cabai-cli — Cabai Trace Command-Line Interface
//!
//! Verifies chili product identifiers from a terminal, against a JSON
//! dataset file or a remote traceability API, with the same verdicts and
//! guidance the HTTP service returns.
//!
//! ## Subcommands
//!
//! - `verify`: full verification of one identifier
//! - `check`: offline format check of one or more identifiers
//! - `canonicalize`: print the canonical form of an identifier
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | valid / well-formed |
//! | 1 | not trusted, malformed, or a configuration error |
//! | 2 | record source unavailable; retry later |
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `cabai-verify` and `cabai-core`.

pub mod canonicalize;
pub mod check;
pub mod verify;
