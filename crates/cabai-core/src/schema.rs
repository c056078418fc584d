//! # Identifier Schema — Product Identifier Grammar
//!
//! The single definition of what a well-formed product identifier is:
//!
//! ```text
//! <product class>-<harvest code>-<batch code>-<issue date>
//!   3 letters      letter+3 digits letter+3 digits  YYYYMMDD
//!
//! e.g. CHI-H001-B001-20260102
//! ```
//!
//! ## Case Policy
//!
//! - The product class accepts ASCII letters in any case and is normalized
//!   to uppercase (`chi` → `CHI`).
//! - The leading letter of the harvest and batch codes accepts either case
//!   and is kept exactly as typed. `h001` is well-formed but is a different
//!   lookup key from `H001`.
//! - Only ASCII letters and digits are accepted; anything else is an
//!   invalid character.
//! - The issue date must be a real calendar day in years 0001 to 9999.
//!
//! ## Security Invariant
//!
//! The canonical form rebuilt from a parsed identifier is byte-identical to
//! the normalized input. Lookups are keyed by that canonical form, so two
//! inputs that canonicalize differently can never resolve to the same record.

use chrono::{Datelike, NaiveDate};

use crate::error::{CharClass, MalformedReason, ParseError, Segment};
use crate::identifier::ProductIdentifier;

/// Separator between identifier segments.
pub const SEPARATOR: char = '-';

/// Number of segments in a product identifier.
pub const SEGMENT_COUNT: usize = 4;

/// Length of the product class segment.
pub const PRODUCT_CLASS_LEN: usize = 3;

/// Length of the harvest and batch code segments.
pub const CODE_LEN: usize = 4;

/// Length of the issue date segment.
pub const DATE_LEN: usize = 8;

/// Validate an already-trimmed, non-empty identifier and build the
/// structured value.
///
/// Segments are checked left to right and the first failure is reported.
/// Use [`crate::parser::parse`] for raw user input; it trims and handles the
/// empty case before delegating here.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] naming the failing segment.
pub fn validate(input: &str) -> Result<ProductIdentifier, ParseError> {
    let parts: Vec<&str> = input.split(SEPARATOR).collect();
    if parts.len() != SEGMENT_COUNT {
        return Err(malformed(
            Segment::Identifier,
            MalformedReason::SegmentCount {
                expected: SEGMENT_COUNT,
                found: parts.len(),
            },
        ));
    }

    let product_class = product_class(parts[0])?;
    let harvest_code = code(parts[1], Segment::HarvestCode)?;
    let batch_code = code(parts[2], Segment::BatchCode)?;
    let issue_date = issue_date(parts[3])?;

    Ok(ProductIdentifier::from_parts(
        product_class,
        harvest_code,
        batch_code,
        issue_date,
    ))
}

/// Whether `input` (already trimmed) is a well-formed identifier.
pub fn is_valid(input: &str) -> bool {
    validate(input).is_ok()
}

/// Render the canonical string form of a parsed identifier.
pub fn canonicalize(id: &ProductIdentifier) -> String {
    let date = id.issue_date();
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{:04}{:02}{:02}",
        id.product_class(),
        id.harvest_code(),
        id.batch_code(),
        date.year(),
        date.month(),
        date.day(),
    )
}

/// Normalize raw input to its canonical form without keeping the
/// structured value: trims, then uppercases the product class.
///
/// # Errors
///
/// Same as [`crate::parser::parse`].
pub fn normalize(raw: &str) -> Result<String, ParseError> {
    crate::parser::parse(raw).map(|id| canonicalize(&id))
}

// ─── Segment validators ──────────────────────────────────────────────

fn product_class(segment: &str) -> Result<String, ParseError> {
    check_shape(
        segment,
        Segment::ProductClass,
        &[CharClass::Letter; PRODUCT_CLASS_LEN],
    )?;
    Ok(segment.to_ascii_uppercase())
}

fn code(segment: &str, which: Segment) -> Result<String, ParseError> {
    check_shape(
        segment,
        which,
        &[
            CharClass::Letter,
            CharClass::Digit,
            CharClass::Digit,
            CharClass::Digit,
        ],
    )?;
    Ok(segment.to_string())
}

fn issue_date(segment: &str) -> Result<NaiveDate, ParseError> {
    check_shape(segment, Segment::IssueDate, &[CharClass::Digit; DATE_LEN])?;

    // All eight characters are ASCII digits, so byte slicing is safe.
    let invalid = || {
        malformed(
            Segment::IssueDate,
            MalformedReason::InvalidDate {
                value: segment.to_string(),
            },
        )
    };
    let year: i32 = segment[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = segment[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = segment[6..8].parse().map_err(|_| invalid())?;
    // Year 0000 is not a Gregorian calendar year.
    if year == 0 {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Check length first, then the character class at each position.
fn check_shape(segment: &str, which: Segment, shape: &[CharClass]) -> Result<(), ParseError> {
    let found = segment.chars().count();
    if found != shape.len() {
        return Err(malformed(
            which,
            MalformedReason::Length {
                expected: shape.len(),
                found,
            },
        ));
    }

    for (index, (ch, class)) in segment.chars().zip(shape).enumerate() {
        let ok = match class {
            CharClass::Letter => ch.is_ascii_alphabetic(),
            CharClass::Digit => ch.is_ascii_digit(),
        };
        if !ok {
            return Err(malformed(
                which,
                MalformedReason::InvalidCharacter {
                    character: ch,
                    position: index + 1,
                    expected: *class,
                },
            ));
        }
    }
    Ok(())
}

fn malformed(segment: Segment, reason: MalformedReason) -> ParseError {
    ParseError::Malformed { segment, reason }
}
