//! # Product Identifier
//!
//! The structured, validated form of a product code such as
//! `CHI-H001-B001-20260102`. A `ProductIdentifier` can only be obtained
//! through the parser, so holding one is proof that the grammar in
//! [`crate::schema`] was satisfied.
//!
//! Serializes as its canonical string. Deserialization routes through the
//! parser, so invalid identifiers are rejected at the serde boundary rather
//! than silently accepted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A parsed product identifier. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductIdentifier {
    product_class: String,
    harvest_code: String,
    batch_code: String,
    issue_date: NaiveDate,
}

impl ProductIdentifier {
    /// Assemble from already-validated parts. Only the schema calls this.
    pub(crate) fn from_parts(
        product_class: String,
        harvest_code: String,
        batch_code: String,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            product_class,
            harvest_code,
            batch_code,
            issue_date,
        }
    }

    /// Parse raw input. Equivalent to [`crate::parser::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] describing the first grammar violation.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        crate::parser::parse(raw)
    }

    /// Three-letter product class, always uppercase.
    pub fn product_class(&self) -> &str {
        &self.product_class
    }

    /// Harvest code as typed (e.g. `H001`).
    pub fn harvest_code(&self) -> &str {
        &self.harvest_code
    }

    /// Batch code as typed (e.g. `B001`).
    pub fn batch_code(&self) -> &str {
        &self.batch_code
    }

    /// Issue date.
    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    /// Canonical string form; the record lookup key.
    pub fn canonical(&self) -> String {
        crate::schema::canonicalize(self)
    }
}

impl std::fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl std::str::FromStr for ProductIdentifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl Serialize for ProductIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for ProductIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        crate::parser::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_canonical() {
        let id: ProductIdentifier = "chi-H001-B001-20260102".parse().unwrap();
        assert_eq!(id.to_string(), "CHI-H001-B001-20260102");
        assert_eq!(id.canonical(), "CHI-H001-B001-20260102");
    }

    #[test]
    fn test_serde_as_canonical_string() {
        let id = ProductIdentifier::parse("CHI-H001-B001-20260102").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CHI-H001-B001-20260102\"");
        let back: ProductIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<ProductIdentifier, _> = serde_json::from_str("\"CHI-1-2-3\"");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("harvest code"), "unexpected error: {err}");
    }

    #[test]
    fn test_equal_inputs_equal_values() {
        let a = ProductIdentifier::parse("chi-H001-B001-20260102").unwrap();
        let b = ProductIdentifier::parse("CHI-H001-B001-20260102").unwrap();
        assert_eq!(a, b);
        let c = ProductIdentifier::parse("CHI-h001-B001-20260102").unwrap();
        assert_ne!(a, c);
    }
}
