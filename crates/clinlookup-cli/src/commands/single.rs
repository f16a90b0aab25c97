//! Single command - resolve one gene and variant.

use std::process::ExitCode;

use clinlookup::{Failure, Resolver, ResolverConfig, VariantRecord};
use colored::Colorize;
use serde_json::json;

use super::EXIT_UNRESOLVED;

pub fn run(
    gene: &str,
    variant: &str,
    as_json: bool,
    config: ResolverConfig,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let resolver = Resolver::with_config(config)?;
    let outcome = resolver.resolve(gene, variant);

    if as_json {
        let value = match &outcome {
            Ok(record) => json!({ "gene": gene, "variant": variant, "record": record }),
            Err(failure) => json!({
                "gene": gene,
                "variant": variant,
                "error": failure.to_string(),
                "failure": failure,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match &outcome {
            Ok(record) => print_record(record),
            Err(failure) => print_failure(failure),
        }
    }

    Ok(match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(EXIT_UNRESOLVED),
    })
}

/// Key/value dump of a resolved record.
pub fn print_record(record: &VariantRecord) {
    println!();
    println!("{}", "Detailed Variant Information:".green().bold());
    for (label, value) in record.fields() {
        println!("  {:22} {}", format!("{}:", label).cyan(), value);
    }
}

/// The failure message, verbatim.
pub fn print_failure(failure: &Failure) {
    println!("{}", failure);
}
