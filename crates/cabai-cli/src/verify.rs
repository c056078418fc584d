//! # Verify Subcommand
//!
//! Runs the full verification pipeline for one identifier: parse, resolve
//! against the configured source, apply revocation and expiry policy at a
//! verification moment, and print the verdict with its guidance.
//!
//! ```text
//! cabai verify CHI-H001-B001-20260102 --dataset data/products.json
//! cabai verify CHI-H001-B001-20260102 --source-url https://trace.example --json
//! cabai verify CHI-H003-B002-20250610 --dataset data/products.json --at 2026-03-01
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use cabai_core::{Timestamp, TraceabilityRecord};
use cabai_resolver::{ResolverConfig, SourceSpec, DEFAULT_LOOKUP_TIMEOUT};
use cabai_verify::{VerificationEngine, VerificationResult};

/// Arguments for the `cabai verify` subcommand.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Product identifier as printed on the label (e.g. CHI-H001-B001-20260102).
    pub identifier: String,

    /// JSON dataset file of traceability records.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Base URL of a remote traceability API.
    #[arg(long, conflicts_with = "dataset")]
    pub source_url: Option<Url>,

    /// Per-lookup deadline in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Verification moment: a date (YYYY-MM-DD) or an RFC 3339 timestamp.
    /// Defaults to now.
    #[arg(long, value_parser = Timestamp::parse_date_or_timestamp)]
    pub at: Option<Timestamp>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    /// Resolver settings described by the flags. The cache is off; a CLI
    /// invocation performs a single lookup.
    pub fn resolver_config(&self) -> ResolverConfig {
        let source = match (&self.source_url, &self.dataset) {
            (Some(url), _) => SourceSpec::Remote(url.clone()),
            (None, Some(path)) => SourceSpec::Dataset(path.clone()),
            (None, None) => SourceSpec::Empty,
        };
        ResolverConfig {
            source,
            lookup_timeout: self
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT),
            cache_ttl: Duration::ZERO,
        }
    }
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let resolver = args
        .resolver_config()
        .build()
        .context("failed to initialize record source")?;
    let engine = VerificationEngine::new(resolver);
    let moment = args.at.unwrap_or_else(Timestamp::now);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(engine.verify_at(&args.identifier, moment));

    if args.json {
        let json = serde_json::to_string_pretty(&to_json(&result)?)?;
        println!("{json}");
    } else {
        println!("{}", render_text(&result));
    }

    Ok(exit_code(&result))
}

/// Process exit code for a verdict.
pub fn exit_code(result: &VerificationResult) -> u8 {
    if result.is_trusted() {
        0
    } else if result.is_retryable() {
        2
    } else {
        1
    }
}

/// JSON rendering: the tagged result with `trusted` and `message` alongside,
/// matching the HTTP response body.
pub fn to_json(result: &VerificationResult) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(result)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("trusted".into(), result.is_trusted().into());
        obj.insert("message".into(), result.guidance().into());
    }
    Ok(value)
}

/// Human-readable rendering.
pub fn render_text(result: &VerificationResult) -> String {
    let mut lines = vec![format!("Verdict: {}", result.verdict())];
    if let Some(id) = result.identifier() {
        lines.push(format!("Product: {id}"));
    }
    if let VerificationResult::Expired { expired_refs, .. } = result {
        lines.push(format!("Expired certifications: {}", expired_refs.join(", ")));
    }
    if let Some(record) = result.record() {
        lines.extend(record_lines(record));
    }
    lines.push(String::new());
    lines.push(result.guidance());
    lines.join("\n")
}

fn record_lines(record: &TraceabilityRecord) -> Vec<String> {
    let mut lines = vec![
        format!("  Grade:       {}", record.grade),
        format!("  Farm origin: {}", record.farm_origin),
    ];
    if let Some(farmer) = &record.farmer_name {
        lines.push(format!("  Farmer:      {farmer}"));
    }
    if let Some(date) = record.harvest_date {
        lines.push(format!("  Harvested:   {date}"));
    }
    if let Some(kg) = record.weight_kg {
        lines.push(format!("  Weight:      {kg} kg"));
    }
    lines.push(format!("  Status:      {}", record.status));

    if !record.production_timeline.is_empty() {
        lines.push("  Timeline:".to_string());
        for event in &record.production_timeline {
            match &event.description {
                Some(desc) => lines.push(format!("    {}  {}: {desc}", event.at, event.stage)),
                None => lines.push(format!("    {}  {}", event.at, event.stage)),
            }
        }
    }
    if !record.certifications.is_empty() {
        lines.push("  Certifications:".to_string());
        for cert in &record.certifications {
            let issuer = cert
                .issuer
                .as_deref()
                .map(|i| format!(" [{i}]"))
                .unwrap_or_default();
            lines.push(format!(
                "    {}{issuer} (expires {})",
                cert.reference, cert.expires_on
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = include_str!("../../../data/products.json");

    fn args(dir: &tempfile::TempDir, identifier: &str) -> VerifyArgs {
        let path = dir.path().join("products.json");
        std::fs::write(&path, DATASET).unwrap();
        VerifyArgs {
            identifier: identifier.to_string(),
            dataset: Some(path),
            source_url: None,
            timeout_ms: None,
            at: Some(Timestamp::parse_date_or_timestamp("2026-03-01").unwrap()),
            json: false,
        }
    }

    #[test]
    fn verify_valid_product_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_verify(&args(&dir, "CHI-H001-B001-20260102")).unwrap(), 0);
    }

    #[test]
    fn verify_distrust_verdicts_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        for id in [
            "CHI-H002-B001-20260102",
            "CHI-H003-B002-20250610",
            "CHI-H999-B999-20991231",
            "not-a-code",
        ] {
            assert_eq!(run_verify(&args(&dir, id)).unwrap(), 1, "{id}");
        }
    }

    #[test]
    fn verify_json_output_exits_like_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir, "chi-H001-B001-20260102");
        a.json = true;
        assert_eq!(run_verify(&a).unwrap(), 0);
    }

    #[test]
    fn verify_missing_dataset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir, "CHI-H001-B001-20260102");
        a.dataset = Some(dir.path().join("missing.json"));
        let err = run_verify(&a).unwrap_err();
        assert!(format!("{err:#}").contains("record source"));
    }

    #[test]
    fn verify_unreachable_source_exits_two() {
        let a = VerifyArgs {
            identifier: "CHI-H001-B001-20260102".to_string(),
            dataset: None,
            source_url: Some("http://127.0.0.1:1".parse().unwrap()),
            timeout_ms: Some(300),
            at: None,
            json: false,
        };
        assert_eq!(run_verify(&a).unwrap(), 2);
    }

    #[test]
    fn source_url_takes_precedence_in_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir, "CHI-H001-B001-20260102");
        a.source_url = Some("https://trace.example".parse().unwrap());
        a.timeout_ms = Some(750);
        let config = a.resolver_config();
        assert!(matches!(config.source, SourceSpec::Remote(_)));
        assert_eq!(config.lookup_timeout, Duration::from_millis(750));
        assert_eq!(config.cache_ttl, Duration::ZERO);
    }

    #[test]
    fn no_source_flags_means_empty_source() {
        let a = VerifyArgs {
            identifier: "CHI-H001-B001-20260102".to_string(),
            dataset: None,
            source_url: None,
            timeout_ms: None,
            at: None,
            json: false,
        };
        let config = a.resolver_config();
        assert_eq!(config.source, SourceSpec::Empty);
        assert_eq!(config.lookup_timeout, DEFAULT_LOOKUP_TIMEOUT);
        assert_eq!(run_verify(&a).unwrap(), 1);
    }

    #[test]
    fn json_carries_verdict_trust_and_message() {
        let result = VerificationResult::Malformed {
            reason: cabai_core::parse("").unwrap_err(),
        };
        let json = to_json(&result).unwrap();
        assert_eq!(json["verdict"], "malformed");
        assert_eq!(json["trusted"], false);
        assert!(json["message"].as_str().unwrap().contains("CHI-H001-B001-20260102"));
    }

    #[test]
    fn text_rendering_lists_record_details() {
        let source = cabai_resolver::InMemorySource::from_json_str(DATASET).unwrap();
        let record = source
            .get("CHI-H003-B002-20250610")
            .cloned()
            .unwrap()
            .into_normalized();
        let moment = Timestamp::parse_date_or_timestamp("2026-03-01").unwrap();
        let text = render_text(&cabai_verify::evaluate(record, &moment));

        assert!(text.starts_with("Verdict: expired"));
        assert!(text.contains("Product: CHI-H003-B002-20250610"));
        assert!(text.contains("Expired certifications: ORG-JB-2024-0007"));
        assert!(text.contains("Certifications:"));
    }

    #[test]
    fn exit_codes_by_verdict() {
        let id = cabai_core::parse("CHI-H001-B001-20260102").unwrap();
        assert_eq!(
            exit_code(&VerificationResult::NotFound {
                identifier: id.clone()
            }),
            1
        );
        assert_eq!(
            exit_code(&VerificationResult::SourceUnavailable { identifier: id }),
            2
        );
    }
}
