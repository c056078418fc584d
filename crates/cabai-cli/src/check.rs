//! # Check Subcommand
//!
//! Offline format check. Parses each identifier and reports either its
//! canonical form or the failing segment with a hint on how to fix it.
//! Nothing is looked up.

use anyhow::Result;
use clap::Args;

use cabai_core::ParseError;
use cabai_verify::guidance::malformed_hint;

/// Arguments for the `cabai check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// One or more identifiers to check.
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Print results as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Outcome of checking one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub input: String,
    pub result: Result<String, ParseError>,
}

impl CheckOutcome {
    fn to_json(&self) -> serde_json::Value {
        match &self.result {
            Ok(canonical) => serde_json::json!({
                "input": self.input,
                "valid": true,
                "canonical": canonical,
            }),
            Err(reason) => serde_json::json!({
                "input": self.input,
                "valid": false,
                "reason": reason,
                "hint": malformed_hint(reason),
            }),
        }
    }
}

/// Check every input. Order is preserved.
pub fn check_all(inputs: &[String]) -> Vec<CheckOutcome> {
    inputs
        .iter()
        .map(|input| CheckOutcome {
            input: input.clone(),
            result: cabai_core::schema::normalize(input),
        })
        .collect()
}

/// Execute the check subcommand. Exits 1 if any input is malformed.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let outcomes = check_all(&args.identifiers);

    if args.json {
        let values: Vec<_> = outcomes.iter().map(CheckOutcome::to_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(canonical) => println!("OK    {canonical}"),
                Err(reason) => {
                    println!("FAIL  {:?}: {reason}", outcome.input);
                    println!("      {}", malformed_hint(reason));
                }
            }
        }
    }

    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(checked = outcomes.len(), failures, "check complete");
    Ok(if failures == 0 { 0 } else { 1 })
}
