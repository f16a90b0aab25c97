//! Interactive command - prompt for mode, then for inputs.

use std::path::PathBuf;
use std::process::ExitCode;

use clinlookup::ResolverConfig;
use dialoguer::{Input, Select};

const DEFAULT_DELAY_MS: u64 = 1000;

pub fn run(config: ResolverConfig, verbose: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mode = Select::new()
        .with_prompt("Query mode")
        .items(&["single - enter one gene and variant", "batch - read a spreadsheet"])
        .default(0)
        .interact()?;

    if mode == 0 {
        let gene: String = Input::new()
            .with_prompt("Gene name (e.g., ASXL1)")
            .interact_text()?;
        let variant: String = Input::new()
            .with_prompt("Variant (residue & allele changes admitted)")
            .interact_text()?;

        super::single::run(&gene, &variant, false, config)
    } else {
        let input: String = Input::new()
            .with_prompt("Path to input file (e.g., variants.xlsx)")
            .interact_text()?;
        let output: String = Input::new()
            .with_prompt("Output file (e.g., clinvar_results.xlsx)")
            .allow_empty(true)
            .interact_text()?;

        let output = (!output.trim().is_empty()).then(|| PathBuf::from(output.trim()));
        super::batch::run(
            PathBuf::from(input.trim()),
            output,
            None,
            DEFAULT_DELAY_MS,
            config,
            verbose,
        )
    }
}
