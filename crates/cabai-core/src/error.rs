//! # Error Types — Identifier Parse Failures
//!
//! Defines the error types produced while turning raw text into domain
//! values. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Parse errors name the failing segment and the concrete reason, so a
//!   presentation layer can tell the user exactly which part to fix.
//! - Parse errors are plain data (`Clone`, `Eq`, serde) because they travel
//!   inside the serialized verification verdict.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of a product identifier a parse failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// The identifier as a whole (used for segment-count failures).
    Identifier,
    /// First segment: three-letter product class (e.g. `CHI`).
    ProductClass,
    /// Second segment: harvest code (e.g. `H001`).
    HarvestCode,
    /// Third segment: batch code (e.g. `B001`).
    BatchCode,
    /// Fourth segment: issue date as `YYYYMMDD`.
    IssueDate,
}

impl Segment {
    /// Human-readable segment name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::ProductClass => "product class",
            Self::HarvestCode => "harvest code",
            Self::BatchCode => "batch code",
            Self::IssueDate => "issue date",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character class expected at a position of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// An ASCII letter.
    Letter,
    /// An ASCII digit.
    Digit,
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Letter => f.write_str("letter"),
            Self::Digit => f.write_str("digit"),
        }
    }
}

/// Why a segment failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedReason {
    /// The identifier does not split into the expected number of segments.
    #[error("expected {expected} segments separated by '-', found {found}")]
    SegmentCount {
        /// Required segment count.
        expected: usize,
        /// Segment count found in the input.
        found: usize,
    },

    /// A segment has the wrong number of characters.
    #[error("expected {expected} characters, found {found}")]
    Length {
        /// Required length in characters.
        expected: usize,
        /// Length found in the input.
        found: usize,
    },

    /// A character is outside the class allowed at its position.
    #[error("invalid character {character:?} at position {position}, expected a {expected}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// 1-based position within the segment.
        position: usize,
        /// The class the grammar requires at that position.
        expected: CharClass,
    },

    /// Eight digits that do not denote a real Gregorian calendar date.
    #[error("{value:?} is not a valid calendar date (YYYYMMDD)")]
    InvalidDate {
        /// The rejected date segment.
        value: String,
    },
}

impl MalformedReason {
    /// Stable name of the failure class, carrying none of the offending input.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SegmentCount { .. } => "segment_count",
            Self::Length { .. } => "length",
            Self::InvalidCharacter { .. } => "invalid_character",
            Self::InvalidDate { .. } => "invalid_date",
        }
    }
}

/// Failure to parse a raw product identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// The input was empty or contained only whitespace.
    #[error("identifier is empty")]
    Empty,

    /// The input violates the identifier grammar.
    #[error("malformed {segment}: {reason}")]
    Malformed {
        /// The segment that failed.
        segment: Segment,
        /// Why it failed.
        reason: MalformedReason,
    },
}

impl ParseError {
    /// The failing segment, if the error is segment-specific.
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Self::Empty => None,
            Self::Malformed { segment, .. } => Some(*segment),
        }
    }

    /// Same string as the serialized `reason.kind` tag, or `"empty"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Malformed { reason, .. } => reason.kind(),
        }
    }
}

/// Errors raised when constructing validated record-model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a valid RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The timestamp carries a non-`Z` offset where UTC is required.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtcTimestamp(String),

    /// The string is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid calendar date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}
