//! Gene-aware variant resolution.
//!
//! A resolution is a search followed by one summary fetch per candidate.
//! Candidates are examined in server order and the first one associated
//! with the requested gene (and not excluded by policy) wins.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use tracing::{debug, instrument, warn};

use crate::error::{ClinError, Result};
use crate::query::{DEFAULT_BASE_URL, EutilsEndpoints, Query};
use crate::record::{Failure, VariantRecord};
use crate::summary::{parse_search_response, parse_summary_response};
use crate::transport::{HttpTransport, Transport};

/// Outcome of resolving one query.
pub type Resolution = std::result::Result<VariantRecord, Failure>;

/// Title fragments marking structural variants.
const STRUCTURAL_MARKERS: &[&str] = &["del", "dup"];

/// Which gene-matched candidates are still rejected, by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusionPolicy {
    /// Accept every gene-matched candidate.
    KeepAll,
    /// Reject titles containing "del" or "dup", ignoring case.
    #[default]
    ExcludeStructural,
}

impl ExclusionPolicy {
    /// Whether a candidate with this title is rejected.
    pub fn excludes(&self, title: &str) -> bool {
        match self {
            ExclusionPolicy::KeepAll => false,
            ExclusionPolicy::ExcludeStructural => {
                let title = title.to_lowercase();
                STRUCTURAL_MARKERS.iter().any(|m| title.contains(m))
            }
        }
    }
}

/// Configuration for a [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// E-utilities base URL.
    pub base_url: String,
    /// NCBI API key, raising the server's rate limit.
    pub api_key: Option<String>,
    /// Most candidates examined per query. Also sent as `retmax`.
    pub max_candidates: usize,
    /// Title-based exclusion applied after the gene check.
    pub exclusion: ExclusionPolicy,
    /// Per-request timeout for the HTTP transport.
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_candidates: 20,
            exclusion: ExclusionPolicy::default(),
            timeout: crate::transport::DEFAULT_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by `NCBI_API_KEY`, `CLINLOOKUP_BASE_URL`,
    /// `CLINLOOKUP_MAX_CANDIDATES` and `CLINLOOKUP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ResolverConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("NCBI_API_KEY") {
            config.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = non_empty("CLINLOOKUP_BASE_URL") {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = non_empty("CLINLOOKUP_MAX_CANDIDATES") {
            config.max_candidates = parse_positive("CLINLOOKUP_MAX_CANDIDATES", &raw)?;
        }
        if let Some(raw) = non_empty("CLINLOOKUP_TIMEOUT_SECS") {
            let secs = parse_positive("CLINLOOKUP_TIMEOUT_SECS", &raw)?;
            config.timeout = Duration::from_secs(secs as u64);
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClinError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

/// Resolves (gene, variant) pairs against ClinVar.
///
/// Holds no per-query state; every call is independent and issues its own
/// requests. Failures are returned as [`Failure`] values, never panics.
pub struct Resolver {
    config: ResolverConfig,
    endpoints: EutilsEndpoints,
    transport: Arc<dyn Transport>,
}

impl Resolver {
    /// Create a resolver with default configuration and an HTTP transport.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with custom configuration and an HTTP transport.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let transport = HttpTransport::with_timeout(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a resolver that sends requests through `transport`.
    pub fn with_transport(config: ResolverConfig, transport: Arc<dyn Transport>) -> Self {
        let endpoints = EutilsEndpoints::new(config.base_url.clone(), config.api_key.clone());
        Self {
            config,
            endpoints,
            transport,
        }
    }

    /// Get the configuration for this resolver.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a gene and variant notation.
    pub fn resolve(&self, gene: &str, variant: &str) -> Resolution {
        self.resolve_query(&Query::new(gene, variant))
    }

    /// Resolve a prepared query.
    #[instrument(skip_all, fields(gene = %query.gene, variant = %query.variant))]
    pub fn resolve_query(&self, query: &Query) -> Resolution {
        let max_candidates = self.config.max_candidates.max(1);
        let ids = self.search(query, max_candidates).map_err(|e| {
            warn!(error = %e, "ClinVar search failed");
            Failure::SearchError {
                message: e.to_string(),
            }
        })?;

        if ids.is_empty() {
            debug!("Search returned no candidates");
            return Err(Failure::NoneFound {
                gene: query.gene.clone(),
            });
        }
        if ids.len() > max_candidates {
            debug!(
                total = ids.len(),
                examined = max_candidates,
                "Candidate list truncated"
            );
        }

        let mut found_genes: IndexSet<String> = IndexSet::new();
        let mut excluded = 0;

        for id in ids.iter().take(max_candidates) {
            let url = self.endpoints.summary_url(id);
            let body = match self.transport.get(&url) {
                Ok(body) => body,
                Err(e) => {
                    warn!(id = %id, error = %e, "Summary fetch failed, skipping candidate");
                    continue;
                }
            };

            let Some(summary) = parse_summary_response(&body, id) else {
                debug!(id = %id, "No usable summary, skipping candidate");
                continue;
            };

            let symbols = summary.gene_symbols();
            found_genes.extend(symbols.iter().cloned());

            if !summary.has_gene(&query.gene) {
                debug!(id = %id, genes = ?symbols, "Candidate belongs to another gene");
                continue;
            }

            let title = summary.title.as_deref().unwrap_or_default();
            if self.config.exclusion.excludes(title) {
                debug!(id = %id, title, "Candidate excluded by title policy");
                excluded += 1;
                continue;
            }

            debug!(id = %id, "Candidate matched");
            return Ok(VariantRecord::from_summary(id.as_str(), &summary));
        }

        Err(Failure::GeneMismatch {
            gene: query.gene.clone(),
            found_genes: found_genes.into_iter().collect(),
            excluded,
        })
    }

    fn search(&self, query: &Query, retmax: usize) -> Result<Vec<String>> {
        let url = self.endpoints.search_url(query, retmax);
        debug!(transport = self.transport.name(), "Searching ClinVar");
        let body = self.transport.get(&url)?;
        parse_search_response(&body)
    }
}
