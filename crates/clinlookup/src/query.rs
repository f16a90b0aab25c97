//! Query construction for the ClinVar E-utilities endpoints.

use serde::{Deserialize, Serialize};

/// Default E-utilities base URL.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// A (gene, variant) pair to resolve.
///
/// Both values are free-form. The variant is sent to the server as a
/// literal search term and is never validated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub gene: String,
    pub variant: String,
}

impl Query {
    /// Create a query, trimming surrounding whitespace from both values.
    pub fn new(gene: impl AsRef<str>, variant: impl AsRef<str>) -> Self {
        Self {
            gene: gene.as_ref().trim().to_string(),
            variant: variant.as_ref().trim().to_string(),
        }
    }

    /// Whether either value is blank.
    pub fn is_blank(&self) -> bool {
        self.gene.is_empty() || self.variant.is_empty()
    }

    /// Boolean search expression scoping the gene and the variation name.
    pub fn search_term(&self) -> String {
        format!("{}[gene] AND {}[Variation Name]", self.gene, self.variant)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.gene, self.variant)
    }
}

/// URL builder for the esearch/esummary endpoints.
#[derive(Debug, Clone)]
pub struct EutilsEndpoints {
    base_url: String,
    api_key: Option<String>,
}

impl EutilsEndpoints {
    /// Create endpoints rooted at `base_url`. A trailing slash is added if missing.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, api_key }
    }

    /// Search URL for a query, limited to `retmax` identifiers.
    pub fn search_url(&self, query: &Query, retmax: usize) -> String {
        let search_term = query.search_term();
        let term = urlencoding::encode(&search_term);
        let url = format!(
            "{}esearch.fcgi?db=clinvar&term={}&retmode=json&retmax={}",
            self.base_url, term, retmax
        );
        self.with_key(url)
    }

    /// Summary URL for a single variation identifier.
    pub fn summary_url(&self, id: &str) -> String {
        let url = format!(
            "{}esummary.fcgi?db=clinvar&id={}&retmode=json",
            self.base_url,
            urlencoding::encode(id)
        );
        self.with_key(url)
    }

    fn with_key(&self, url: String) -> String {
        match &self.api_key {
            Some(key) => format!("{}&api_key={}", url, urlencoding::encode(key)),
            None => url,
        }
    }
}

impl Default for EutilsEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}
