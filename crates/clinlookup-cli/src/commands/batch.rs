//! Batch command - resolve every row of a spreadsheet.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clinlookup::batch::{read_queries, write_results};
use clinlookup::{BatchDriver, BatchSummary, FixedDelay, OutputFormat, Resolver, ResolverConfig};
use colored::Colorize;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    delay_ms: u64,
    config: ResolverConfig,
    verbose: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let format = output_format(format, output.as_deref())?;
    let output_path = output.unwrap_or_else(|| default_output_path(&input, format));

    println!(
        "{} {}",
        "Reading".cyan().bold(),
        input.display().to_string().white()
    );
    let queries = read_queries(&input)?;

    if queries.is_empty() {
        println!(
            "{} No rows with both Gene and Variant found.",
            "Note:".yellow()
        );
        return Ok(ExitCode::SUCCESS);
    }
    println!("Found {} queries", queries.len().to_string().white().bold());

    let resolver = Resolver::with_config(config)?;
    let driver =
        BatchDriver::new(resolver).with_pacer(FixedDelay(Duration::from_millis(delay_ms)));

    let rows = driver.run_with_progress(&queries, |position, total, row| {
        let status = match &row.outcome {
            Ok(record) => format!("{} {}", "✓".green(), record.accession),
            Err(failure) => format!("{} {}", "✗".red(), failure.kind()),
        };
        println!(
            "  [{}/{}] {} {}",
            position,
            total,
            row.query.to_string().cyan(),
            status
        );
        if verbose {
            if let Err(failure) = &row.outcome {
                println!("        {}", failure.to_string().dimmed());
            }
        }
    });

    write_results(&output_path, &rows, format)?;

    let summary = BatchSummary::from_rows(&rows);
    println!();
    println!(
        "Resolved {} of {} queries ({} failed)",
        summary.resolved.to_string().green().bold(),
        summary.total.to_string().white().bold(),
        summary.failed.to_string().yellow()
    );
    for (kind, count) in &summary.failures_by_kind {
        println!("  {:14} {}", kind, count);
    }
    println!(
        "{} {}",
        "Results saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(ExitCode::SUCCESS)
}

/// Pick the output format from `--format` and the output extension.
///
/// An explicit format must agree with a recognised extension, so TSV bytes
/// never land in a `.xlsx` file.
fn output_format(
    explicit: Option<OutputFormat>,
    output: Option<&Path>,
) -> Result<OutputFormat, Box<dyn std::error::Error>> {
    let inferred = match output {
        Some(path) if path.extension().is_some() => Some(OutputFormat::from_path(path)),
        _ => None,
    };

    match (explicit, inferred) {
        (Some(format), Some(Ok(from_ext))) if format != from_ext => Err(format!(
            "--format {} conflicts with output extension .{}",
            format, from_ext
        )
        .into()),
        (Some(format), _) => Ok(format),
        (None, Some(from_ext)) => Ok(from_ext?),
        (None, None) => Ok(OutputFormat::default()),
    }
}

/// `<dir>/<stem>.clinvar.<format>` next to the input.
fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let mut path = input.to_path_buf();
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    path.set_file_name(format!("{}.clinvar.{}", stem, format));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/variants.xlsx"), OutputFormat::Tsv),
            PathBuf::from("data/variants.clinvar.tsv")
        );
        assert_eq!(
            default_output_path(Path::new("variants.csv"), OutputFormat::Json),
            PathBuf::from("variants.clinvar.json")
        );
    }

    #[test]
    fn test_output_format_choice() {
        let xlsx = Path::new("out.xlsx");

        assert_eq!(output_format(None, Some(xlsx)).unwrap(), OutputFormat::Xlsx);
        assert_eq!(output_format(Some(OutputFormat::Xlsx), Some(xlsx)).unwrap(), OutputFormat::Xlsx);
        assert!(output_format(Some(OutputFormat::Tsv), Some(xlsx)).is_err());

        // Unrecognised or missing extensions defer to the flag.
        assert_eq!(
            output_format(Some(OutputFormat::Csv), Some(Path::new("out.dat"))).unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            output_format(Some(OutputFormat::Json), Some(Path::new("results"))).unwrap(),
            OutputFormat::Json
        );
        assert!(output_format(None, Some(Path::new("out.dat"))).is_err());
        assert_eq!(output_format(None, None).unwrap(), OutputFormat::Tsv);
    }
}
