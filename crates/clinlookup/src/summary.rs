//! Response documents of the esearch and esummary endpoints.
//!
//! ClinVar summaries are loosely shaped: gene associations arrive as
//! objects or bare strings, scalar fields are sometimes empty strings, and
//! unknown ids come back as an `{"error": ...}` object. Everything here is
//! lenient and normalizes at the boundary, so the resolver only sees plain
//! Rust values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClinError, Result};

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    esearchresult: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<Value>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
    errorlist: Option<SearchErrorList>,
}

#[derive(Debug, Deserialize)]
struct SearchErrorList {
    #[serde(default)]
    phrasesnotfound: Vec<String>,
}

/// Extract the candidate identifiers from an esearch response body.
///
/// Identifiers keep the server's order. A body without an `esearchresult`
/// object, or one carrying a server-side `ERROR`, is an error.
pub fn parse_search_response(body: &str) -> Result<Vec<String>> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    let result = envelope
        .esearchresult
        .ok_or_else(|| ClinError::MalformedResponse("missing 'esearchresult'".to_string()))?;

    if let Some(error) = result.error {
        return Err(ClinError::MalformedResponse(format!("search rejected: {}", error)));
    }

    if let Some(errors) = result.errorlist {
        if !errors.phrasesnotfound.is_empty() {
            warn!(
                phrases = ?errors.phrasesnotfound,
                "Search terms not recognised by ClinVar; results may be broader than requested"
            );
        }
    }

    Ok(result.idlist.iter().filter_map(scalar_text).collect())
}

/// Extract the summary for `id` from an esummary response body.
///
/// Returns `None` when the body is not JSON, has no entry for `id`, the
/// entry is empty or an error object, or its fields have unexpected types.
pub fn parse_summary_response(body: &str, id: &str) -> Option<VariantSummary> {
    let document: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            debug!(id, error = %e, "Summary body is not JSON");
            return None;
        }
    };

    let entry = document.get("result")?.get(id)?;
    let object = entry.as_object()?;
    if object.is_empty() || object.contains_key("error") {
        debug!(id, "Summary entry empty or flagged as error");
        return None;
    }

    match VariantSummary::deserialize(entry) {
        Ok(summary) => Some(summary),
        Err(e) => {
            debug!(id, error = %e, "Summary entry has unexpected shape");
            None
        }
    }
}

/// One variation's detail record, as returned by esummary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantSummary {
    #[serde(default, deserialize_with = "lenient_text")]
    pub accession: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    genes: Vec<GeneEntry>,

    #[serde(default, deserialize_with = "lenient_list")]
    variation_set: Vec<VariationSetEntry>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub chr_sort: Option<String>,

    #[serde(default, deserialize_with = "lenient_object")]
    germline_classification: Option<Classification>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub molecular_consequence_list: Vec<String>,
}

impl VariantSummary {
    /// Associated gene symbols, flattened from either entry form. Empty
    /// symbols are dropped.
    pub fn gene_symbols(&self) -> Vec<String> {
        self.genes
            .iter()
            .filter_map(GeneEntry::symbol)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether any associated symbol equals `gene`, ignoring case.
    pub fn has_gene(&self, gene: &str) -> bool {
        let wanted = gene.to_uppercase();
        self.gene_symbols()
            .iter()
            .any(|symbol| symbol.to_uppercase() == wanted)
    }

    /// Canonical SPDI of the first variation-set entry, if it is structured.
    pub fn canonical_spdi(&self) -> Option<&str> {
        match self.variation_set.first()? {
            VariationSetEntry::Structured { canonical_spdi } => canonical_spdi.as_deref(),
            VariationSetEntry::Other(_) => None,
        }
    }

    /// Germline classification description.
    pub fn classification(&self) -> Option<&str> {
        self.germline_classification
            .as_ref()
            .and_then(|c| c.description.as_deref())
    }
}

/// Gene association: `{"symbol": "CHD8", ...}` or a bare `"CHD8"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GeneEntry {
    Structured {
        #[serde(default, deserialize_with = "lenient_text")]
        symbol: Option<String>,
    },
    Bare(String),
    Other(Value),
}

impl GeneEntry {
    fn symbol(&self) -> Option<&str> {
        match self {
            GeneEntry::Structured { symbol } => symbol.as_deref(),
            GeneEntry::Bare(symbol) => Some(symbol.as_str()),
            GeneEntry::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariationSetEntry {
    Structured {
        #[serde(default, deserialize_with = "lenient_text")]
        canonical_spdi: Option<String>,
    },
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
struct Classification {
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
}

/// Strings and numbers become text; empty strings, nulls and anything else
/// become `None`.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Arrays keep the items that fit `T`; `null` and non-arrays become empty.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A value that does not fit `T` is treated as absent.
fn lenient_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
