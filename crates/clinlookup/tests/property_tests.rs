//! Property-based tests for resolution invariants.
//!
//! These tests use proptest to generate gene symbols and candidate sets and
//! check that the resolver keeps its guarantees for all of them:
//!
//! 1. **Empty search**: no identifiers means `NoneFound` and no detail fetch
//! 2. **Gene safety**: a record is only returned for the requested gene
//! 3. **Mismatch**: candidates for other genes never yield a record
//! 4. **Determinism**: same responses, same result
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p clinlookup --test property_tests
//! PROPTEST_CASES=10000 cargo test -p clinlookup --test property_tests
//! ```

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use clinlookup::{Failure, MockTransport, Resolver, ResolverConfig};

// =============================================================================
// Test Strategies
// =============================================================================

/// Generate HGNC-like gene symbols.
fn gene_symbol() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{1,7}"
}

/// Generate a gene symbol together with a randomly re-cased spelling of it.
fn symbol_with_recasing() -> impl Strategy<Value = (String, String)> {
    gene_symbol().prop_flat_map(|symbol| {
        let len = symbol.len();
        (Just(symbol), prop::collection::vec(any::<bool>(), len)).prop_map(|(symbol, flips)| {
            let recased = symbol
                .chars()
                .zip(flips)
                .map(|(c, lower)| if lower { c.to_ascii_lowercase() } else { c })
                .collect();
            (symbol, recased)
        })
    })
}

fn resolver_for(mock: &Arc<MockTransport>) -> Resolver {
    Resolver::with_transport(ResolverConfig::default(), mock.clone())
}

fn single_candidate(genes: &[String]) -> Arc<MockTransport> {
    let summary = json!({ "result": { "uids": ["42"], "42": {
        "accession": "VCV000000042",
        "title": "NM_000000.1(GENE):c.100A>G (p.Lys34Glu)",
        "genes": genes.iter().map(|g| json!({ "symbol": g })).collect::<Vec<_>>()
    }}});
    Arc::new(
        MockTransport::new()
            .with_response("esearch", json!({ "esearchresult": { "idlist": ["42"] } }).to_string())
            .with_response("id=42&", summary.to_string()),
    )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn empty_search_never_fetches_details(gene in gene_symbol(), variant in "p\\.[A-Z][a-z]{2}[0-9]{1,4}[A-Z][a-z]{2}") {
        let mock = Arc::new(
            MockTransport::new()
                .with_response("esearch", json!({ "esearchresult": { "idlist": [] } }).to_string()),
        );

        let outcome = resolver_for(&mock).resolve(&gene, &variant);

        prop_assert_eq!(outcome, Err(Failure::NoneFound { gene }));
        prop_assert_eq!(mock.call_count("esummary"), 0);
    }

    #[test]
    fn matching_gene_in_any_case_yields_record(
        (symbol, requested) in symbol_with_recasing(),
        others in prop::collection::vec(gene_symbol(), 0..4),
    ) {
        let mut genes = others;
        genes.push(symbol);
        let mock = single_candidate(&genes);

        let record = resolver_for(&mock).resolve(&requested, "p.Lys34Glu").unwrap();

        prop_assert!(!record.gene_symbol().is_empty());
        prop_assert!(record
            .gene_symbols
            .iter()
            .any(|g| g.eq_ignore_ascii_case(&requested)));
    }

    #[test]
    fn unrelated_genes_never_yield_record(
        requested in gene_symbol(),
        found in prop::collection::vec(gene_symbol(), 1..4),
    ) {
        prop_assume!(found.iter().all(|g| !g.eq_ignore_ascii_case(&requested)));
        let mock = single_candidate(&found);

        let outcome = resolver_for(&mock).resolve(&requested, "p.Lys34Glu");

        match outcome {
            Err(Failure::GeneMismatch { gene, found_genes, excluded }) => {
                prop_assert_eq!(gene, requested);
                prop_assert_eq!(excluded, 0);
                for g in &found {
                    prop_assert!(found_genes.contains(g));
                }
            }
            other => prop_assert!(false, "expected gene mismatch, got {:?}", other),
        }
    }

    #[test]
    fn resolution_is_deterministic(genes in prop::collection::vec(gene_symbol(), 1..4), pick in 0usize..4) {
        let requested = genes[pick % genes.len()].clone();
        let mock = single_candidate(&genes);
        let resolver = resolver_for(&mock);

        prop_assert_eq!(
            resolver.resolve(&requested, "p.Lys34Glu"),
            resolver.resolve(&requested, "p.Lys34Glu")
        );
    }
}
