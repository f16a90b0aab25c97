//! Normalized resolution results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::summary::VariantSummary;

/// Sentinel for fields absent from the summary record.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column labels of a resolved record, in output order.
pub const RECORD_COLUMNS: [&str; 8] = [
    "Variation ID",
    "Accession",
    "Title",
    "Canonical SPDI",
    "Gene Symbol",
    "Chromosome",
    "Classification",
    "Molecular Consequence",
];

/// A ClinVar variation that matched the requested gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// ClinVar variation identifier.
    pub variation_id: String,
    /// VCV accession.
    pub accession: String,
    /// Display title, e.g. `NM_001170629.2(CHD8):c.4738C>T (p.Arg1580Trp)`.
    pub title: String,
    /// Canonical SPDI of the first variation-set entry.
    pub canonical_spdi: String,
    /// Associated gene symbols. Always contains the requested gene.
    pub gene_symbols: Vec<String>,
    /// Chromosome sort key.
    pub chromosome: String,
    /// Germline classification description.
    pub classification: String,
    /// Molecular consequence terms.
    pub molecular_consequences: Vec<String>,
}

impl VariantRecord {
    /// Build a record from a summary, defaulting absent fields to [`NOT_AVAILABLE`].
    pub fn from_summary(variation_id: impl Into<String>, summary: &VariantSummary) -> Self {
        let or_na = |value: Option<&str>| value.unwrap_or(NOT_AVAILABLE).to_string();

        Self {
            variation_id: variation_id.into(),
            accession: or_na(summary.accession.as_deref()),
            title: or_na(summary.title.as_deref()),
            canonical_spdi: or_na(summary.canonical_spdi()),
            gene_symbols: summary.gene_symbols(),
            chromosome: or_na(summary.chr_sort.as_deref()),
            classification: or_na(summary.classification()),
            molecular_consequences: summary
                .molecular_consequence_list
                .iter()
                .filter(|term| !term.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Gene symbols joined with ", ".
    pub fn gene_symbol(&self) -> String {
        self.gene_symbols.join(", ")
    }

    /// Consequence terms joined with ", ", or [`NOT_AVAILABLE`] if there are none.
    pub fn molecular_consequence(&self) -> String {
        if self.molecular_consequences.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.molecular_consequences.join(", ")
        }
    }

    /// Labelled values in [`RECORD_COLUMNS`] order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.variation_id.clone(),
            self.accession.clone(),
            self.title.clone(),
            self.canonical_spdi.clone(),
            self.gene_symbol(),
            self.chromosome.clone(),
            self.classification.clone(),
            self.molecular_consequence(),
        ];
        RECORD_COLUMNS.into_iter().zip(values).collect()
    }
}

/// Why a query produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    /// The search request failed or returned an unusable body.
    #[error("Unable to search ClinVar: {message}")]
    SearchError { message: String },

    /// The search matched no variations.
    #[error("No variants found for gene: {gene}")]
    NoneFound { gene: String },

    /// Candidates exist but none is associated with the requested gene
    /// (or every associated one was excluded).
    #[error("{}", mismatch_message(.gene, .found_genes, .excluded))]
    GeneMismatch {
        gene: String,
        found_genes: Vec<String>,
        excluded: usize,
    },
}

impl Failure {
    /// Short machine-friendly label.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::SearchError { .. } => "search_error",
            Failure::NoneFound { .. } => "none_found",
            Failure::GeneMismatch { .. } => "gene_mismatch",
        }
    }
}

fn mismatch_message(gene: &str, found_genes: &[String], excluded: &usize) -> String {
    let mut message = if found_genes.is_empty() {
        format!("No matching ClinVar record for gene {}", gene)
    } else {
        format!(
            "Variant found but not associated with gene {}. Found genes: {}",
            gene,
            found_genes.join(", ")
        )
    };
    if *excluded > 0 {
        message.push_str(&format!(
            " ({} matching record(s) excluded as deletion/duplication)",
            excluded
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::parse_summary_response;

    #[test]
    fn test_from_summary_defaults_missing_fields() {
        let body = r#"{"result":{"9":{"genes":[{"symbol":"CHD8"}]}}}"#;
        let summary = parse_summary_response(body, "9").unwrap();
        let record = VariantRecord::from_summary("9", &summary);

        assert_eq!(record.variation_id, "9");
        assert_eq!(record.gene_symbol(), "CHD8");
        assert_eq!(record.accession, NOT_AVAILABLE);
        assert_eq!(record.canonical_spdi, NOT_AVAILABLE);
        assert_eq!(record.classification, NOT_AVAILABLE);
        assert_eq!(record.molecular_consequence(), NOT_AVAILABLE);
    }

    #[test]
    fn test_fields_follow_column_order() {
        let record = VariantRecord {
            variation_id: "1".into(),
            accession: "VCV000000001".into(),
            title: "t".into(),
            canonical_spdi: "NC_000001.11:1:A:G".into(),
            gene_symbols: vec!["A".into(), "B".into()],
            chromosome: "1".into(),
            classification: "Benign".into(),
            molecular_consequences: vec!["missense variant".into(), "intron variant".into()],
        };
        let fields = record.fields();

        let labels: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(labels, RECORD_COLUMNS.to_vec());
        assert_eq!(fields[4].1, "A, B");
        assert_eq!(fields[7].1, "missense variant, intron variant");
    }

    #[test]
    fn test_failure_messages() {
        let none = Failure::NoneFound { gene: "CHD8".into() };
        assert_eq!(none.to_string(), "No variants found for gene: CHD8");

        let mismatch = Failure::GeneMismatch {
            gene: "CHD8".into(),
            found_genes: vec!["SUPT16H".into(), "TOX4".into()],
            excluded: 0,
        };
        assert_eq!(
            mismatch.to_string(),
            "Variant found but not associated with gene CHD8. Found genes: SUPT16H, TOX4"
        );

        let excluded = Failure::GeneMismatch {
            gene: "ASXL1".into(),
            found_genes: vec!["ASXL1".into()],
            excluded: 1,
        };
        assert!(excluded.to_string().ends_with("(1 matching record(s) excluded as deletion/duplication)"));
        assert_eq!(excluded.kind(), "gene_mismatch");
    }
}
