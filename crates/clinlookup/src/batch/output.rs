//! Writing batch results as TSV, CSV, JSON or an Excel workbook.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{ClinError, Result};

use super::driver::{BatchRow, batch_columns};

/// Output table format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
    Xlsx,
}

/// Worksheet name used for Excel output.
const RESULTS_SHEET: &str = "ClinVar";

impl OutputFormat {
    /// Infer the format from a file extension. No extension means TSV.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension() {
            None => Ok(OutputFormat::Tsv),
            Some(ext) => ext
                .to_string_lossy()
                .parse()
                .map_err(ClinError::UnsupportedFormat),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" | "txt" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, json or xlsx.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Write rows to `path` in `format`.
pub fn write_results(path: impl AsRef<Path>, rows: &[BatchRow], format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ClinError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = BufWriter::new(file);
    write_to(&mut writer, rows, format)?;
    writer.flush().map_err(|e| ClinError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write rows to any writer in `format`.
///
/// Delimited output always carries every column; cells a row lacks are
/// left empty. JSON output lists only the cells each row has. Excel output
/// is a single worksheet with a bold header row.
pub fn write_to<W: Write>(mut writer: W, rows: &[BatchRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tsv => write_delimited(writer, rows, b'\t'),
        OutputFormat::Csv => write_delimited(writer, rows, b','),
        OutputFormat::Json => {
            let cells: Vec<IndexMap<&'static str, String>> =
                rows.iter().map(BatchRow::cells).collect();
            serde_json::to_writer_pretty(writer, &cells)?;
            Ok(())
        }
        OutputFormat::Xlsx => {
            let bytes = workbook_bytes(rows).map_err(|e| ClinError::Spreadsheet(e.to_string()))?;
            writer.write_all(&bytes).map_err(|e| {
                ClinError::Spreadsheet(format!("failed to write workbook: {}", e))
            })
        }
    }
}

fn workbook_bytes(rows: &[BatchRow]) -> std::result::Result<Vec<u8>, XlsxError> {
    let columns = batch_columns();
    let header = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(RESULTS_SHEET)?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let cells = row.cells();
        let line = (i + 1) as u32;
        for (col, name) in columns.iter().enumerate() {
            match cells.get(name) {
                Some(value) if !value.is_empty() => {
                    sheet.write_string(line, col as u16, value.as_str())?;
                }
                _ => {}
            }
        }
    }

    workbook.save_to_buffer()
}

fn write_delimited<W: Write>(writer: W, rows: &[BatchRow], delimiter: u8) -> Result<()> {
    let columns = batch_columns();
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(&columns)?;
    for row in rows {
        let cells = row.cells();
        csv_writer.write_record(
            columns
                .iter()
                .map(|column| cells.get(column).map(String::as_str).unwrap_or("")),
        )?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
