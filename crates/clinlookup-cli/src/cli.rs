//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clinlookup::{ExclusionPolicy, OutputFormat, ResolverConfig};

/// clinlookup: resolve gene + variant names against ClinVar
#[derive(Parser)]
#[command(name = "clinlookup")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keep records whose title marks a deletion or duplication
    #[arg(long, global = true)]
    pub keep_structural: bool,

    /// Most candidates examined per query
    #[arg(long, global = true, value_name = "N")]
    pub max_candidates: Option<usize>,

    /// E-utilities base URL (default: NCBI)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one gene and variant
    Single {
        /// Gene symbol (e.g., "CHD8")
        #[arg(value_name = "GENE")]
        gene: String,

        /// Variant notation, residue or allele change (e.g., "p.Arg1580Trp")
        #[arg(value_name = "VARIANT")]
        variant: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve every row of a spreadsheet with Gene and Variant columns
    Batch {
        /// Input table (CSV/TSV or Excel)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (default: <input>.clinvar.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: tsv, csv, json or xlsx (default: from output extension, else tsv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Pause between queries in milliseconds
        #[arg(long, default_value = "1000", value_name = "MS")]
        delay_ms: u64,
    },

    /// Prompt for mode and inputs
    Interactive,
}

impl Cli {
    /// Resolver configuration: environment first, then command-line overrides.
    pub fn resolver_config(&self) -> clinlookup::Result<ResolverConfig> {
        let mut config = ResolverConfig::from_env()?;

        if self.keep_structural {
            config.exclusion = ExclusionPolicy::KeepAll;
        }
        if let Some(n) = self.max_candidates {
            if n == 0 {
                return Err(clinlookup::ClinError::Config(
                    "--max-candidates must be at least 1".to_string(),
                ));
            }
            config.max_candidates = n;
        }
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }

        Ok(config)
    }
}
