//! # Traceability Record Model
//!
//! The authoritative provenance data for one product identifier: where it
//! was grown, how it was graded, which certificates it carries, and the
//! farm-to-consumer production timeline.
//!
//! Records are created and mutated only by the external record source. The
//! engine treats them as read-only values; the only transformation applied
//! here is [`TraceabilityRecord::into_normalized`], which restores the
//! ordering and set invariants a sloppy source might violate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identifier::ProductIdentifier;
use crate::temporal::Timestamp;

// ─── Grade ───────────────────────────────────────────────────────────

/// Quality grade assigned at harvest. Informational only; never an input
/// to the verification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Grade {
    A,
    B,
    C,
    D,
    /// Grade missing or not recognised.
    #[default]
    Unknown,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::Unknown => "Unknown",
        }
    }

    /// Lenient parse accepting `"A"`, `"a"` and `"Grade A"`. Anything else
    /// maps to [`Grade::Unknown`].
    pub fn parse_lenient(s: &str) -> Self {
        let trimmed = s.trim();
        let letter = match trimmed.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("grade ") => trimmed[6..].trim(),
            _ => trimmed,
        };
        match letter.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            "D" => Self::D,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unknown, Self::parse_lenient))
    }
}

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of a record as published by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// The product is in circulation.
    Active,
    /// The record was withdrawn; the product must not be trusted.
    Revoked,
    /// Replaced by a newer record for the same product line.
    Superseded,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
            Self::Superseded => "superseded",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Certification ───────────────────────────────────────────────────

/// A certificate reference attached to a product (organic, GAP, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certification {
    /// Certificate reference, unique within a record.
    pub reference: String,
    /// Issuing body, when the source provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Last calendar day on which the certificate is valid.
    pub expires_on: NaiveDate,
}

impl Certification {
    /// A certificate is expired when its expiry date is strictly before the
    /// UTC calendar date of `moment`. It is still valid on `expires_on`.
    pub fn is_expired_at(&self, moment: &Timestamp) -> bool {
        self.expires_on < moment.date()
    }
}

// ─── Timeline ────────────────────────────────────────────────────────

/// One stage of the farm-to-consumer production timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When the stage happened. A bare `YYYY-MM-DD` date means midnight UTC.
    #[serde(alias = "date", deserialize_with = "date_or_timestamp")]
    pub at: Timestamp,
    /// Stage name (e.g. "Planting", "Harvest", "Packing").
    #[serde(alias = "event")]
    pub stage: String,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display icon supplied by the source, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn date_or_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Timestamp::parse_date_or_timestamp(&raw).map_err(serde::de::Error::custom)
}

// ─── Record ──────────────────────────────────────────────────────────

/// Provenance data for one product identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityRecord {
    #[serde(alias = "productId")]
    pub identifier: ProductIdentifier,
    #[serde(default)]
    pub grade: Grade,
    /// Farm location (e.g. "Garut, Jawa Barat").
    #[serde(alias = "farmLocation")]
    pub farm_origin: String,
    #[serde(default, alias = "farmerName", skip_serializing_if = "Option::is_none")]
    pub farmer_name: Option<String>,
    #[serde(default, alias = "harvestDate", skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Stage events, chronologically non-decreasing after normalization.
    #[serde(default, alias = "timeline")]
    pub production_timeline: Vec<TimelineEvent>,
    /// Certificate references; unique by `reference` after normalization.
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub status: RecordStatus,
}

impl TraceabilityRecord {
    /// Restore the record invariants:
    ///
    /// - the timeline is stably sorted by `at` (events sharing a timestamp
    ///   keep their source order);
    /// - certifications are unique by reference, keeping the earliest
    ///   expiry for a duplicated reference, in first-seen order.
    pub fn into_normalized(mut self) -> Self {
        self.production_timeline.sort_by_key(|e| e.at);

        let mut unique: Vec<Certification> = Vec::with_capacity(self.certifications.len());
        for cert in self.certifications {
            match unique.iter_mut().find(|c| c.reference == cert.reference) {
                Some(existing) => {
                    if cert.expires_on < existing.expires_on {
                        *existing = cert;
                    }
                }
                None => unique.push(cert),
            }
        }
        self.certifications = unique;
        self
    }

    /// Whether the timeline is chronologically non-decreasing.
    pub fn is_timeline_ordered(&self) -> bool {
        self.production_timeline
            .windows(2)
            .all(|pair| pair[0].at <= pair[1].at)
    }

    /// References of certifications expired at `moment`, in record order.
    pub fn expired_certifications(&self, moment: &Timestamp) -> Vec<String> {
        self.certifications
            .iter()
            .filter(|c| c.is_expired_at(moment))
            .map(|c| c.reference.clone())
            .collect()
    }
}
