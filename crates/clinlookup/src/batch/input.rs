//! Reading (gene, variant) rows from CSV/TSV and Excel files.

use std::fs;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::error::{ClinError, Result};
use crate::query::Query;

const GENE_COLUMN: &str = "Gene";
const VARIANT_COLUMN: &str = "Variant";

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions read through calamine.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read queries from a CSV/TSV or Excel file.
///
/// The first row must name `Gene` and `Variant` columns (any case, any
/// position). Rows with a blank gene or variant are skipped.
pub fn read_queries(path: impl AsRef<Path>) -> Result<Vec<Query>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let queries = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)?
    } else {
        let contents = fs::read(path).map_err(|e| ClinError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse_delimited(&contents)?
    };

    info!(rows = queries.len(), path = %path.display(), "Loaded queries");
    Ok(queries)
}

/// Parse queries from delimited text, detecting the delimiter.
pub fn parse_delimited(bytes: &[u8]) -> Result<Vec<Query>> {
    let delimiter = detect_delimiter(bytes)?;
    let shown = (delimiter as char).escape_default().to_string();
    debug!(delimiter = %shown, "Detected delimiter");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    queries_from_rows(&headers, rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Query>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ClinError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let worksheets = workbook.worksheets();
    let (name, range) = worksheets
        .first()
        .ok_or_else(|| ClinError::EmptyData(format!("{} has no worksheets", path.display())))?;
    debug!(sheet = %name, "Reading first worksheet");

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
    let headers = rows
        .next()
        .ok_or_else(|| ClinError::EmptyData(format!("worksheet '{}' is empty", name)))?;

    queries_from_rows(&headers, rows.collect())
}

fn queries_from_rows(headers: &[String], rows: Vec<Vec<String>>) -> Result<Vec<Query>> {
    let gene_idx = column_index(headers, GENE_COLUMN)?;
    let variant_idx = column_index(headers, VARIANT_COLUMN)?;

    let queries: Vec<Query> = rows
        .iter()
        .map(|row| {
            let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
            Query::new(cell(gene_idx), cell(variant_idx))
        })
        .filter(|query| !query.is_blank())
        .collect();

    if queries.len() < rows.len() {
        debug!(skipped = rows.len() - queries.len(), "Skipped blank rows");
    }
    Ok(queries)
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| ClinError::MissingColumn(format!("{} (found: {})", name, headers.join(", "))))
}

/// Pick the delimiter that splits the leading lines most consistently.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(20)
        .collect();

    let header = lines
        .first()
        .ok_or_else(|| ClinError::EmptyData("input has no header row".to_string()))?;

    let mut best = (b',', 0usize);
    for &delim in DELIMITERS {
        let in_header = count_delimiter_in_line(header, delim);
        if in_header == 0 {
            continue;
        }
        let consistent = lines
            .iter()
            .filter(|line| count_delimiter_in_line(line, delim) == in_header)
            .count();
        // Tab wins ties: it rarely appears inside variant notation.
        let score = consistent * 1000 + in_header * 10 + usize::from(delim == b'\t');
        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut in_quotes = false;
    let mut count = 0;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
