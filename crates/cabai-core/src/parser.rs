//! # Identifier Parser
//!
//! Entry point for raw identifier text, whether typed by a user or decoded
//! from a QR payload. The parser owns input hygiene (surrounding whitespace,
//! empty input) and delegates all structural rules to [`crate::schema`].
//!
//! Parsing is a pure function: no I/O, no shared state, identical output
//! for identical input.

use crate::error::ParseError;
use crate::identifier::ProductIdentifier;
use crate::schema;

/// Parse a raw identifier string.
///
/// Surrounding whitespace is trimmed first. Interior whitespace is not
/// removed and is reported as an invalid character.
///
/// # Errors
///
/// - [`ParseError::Empty`] if nothing remains after trimming.
/// - [`ParseError::Malformed`] naming the first segment that violates the
///   grammar.
pub fn parse(raw: &str) -> Result<ProductIdentifier, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    schema::validate(trimmed)
}
