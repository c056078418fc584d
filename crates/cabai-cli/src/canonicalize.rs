//! # Canonicalize Subcommand
//!
//! Prints the canonical form of an identifier: surrounding whitespace
//! trimmed and the product class uppercased. Codes keep their case.

use anyhow::Result;
use clap::Args;

use cabai_verify::guidance::malformed_hint;

/// Arguments for the `cabai canonicalize` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CanonicalizeArgs {
    /// Identifier to canonicalize.
    pub identifier: String,
}

/// Execute the canonicalize subcommand.
pub fn run_canonicalize(args: &CanonicalizeArgs) -> Result<u8> {
    match cabai_core::schema::normalize(&args.identifier) {
        Ok(canonical) => {
            println!("{canonical}");
            Ok(0)
        }
        Err(reason) => {
            eprintln!("error: {reason}");
            eprintln!("{}", malformed_hint(&reason));
            Ok(1)
        }
    }
}
