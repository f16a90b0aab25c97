//! Sequential batch driver and request pacing.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::query::Query;
use crate::record::RECORD_COLUMNS;
use crate::resolver::{Resolution, Resolver};

/// Default pause between consecutive queries.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Pause policy applied between consecutive resolver calls.
pub trait Pacer: Send + Sync {
    /// Block until the next request may be issued.
    fn pause(&self);
}

/// Sleep for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_DELAY)
    }
}

impl Pacer for FixedDelay {
    fn pause(&self) {
        if !self.0.is_zero() {
            debug!(delay_ms = self.0.as_millis() as u64, "Pausing before next query");
            thread::sleep(self.0);
        }
    }
}

/// Never pause.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&self) {}
}

/// Output columns of a batch table, in order.
pub fn batch_columns() -> Vec<&'static str> {
    let mut columns = vec!["Gene", "Variant"];
    columns.extend(RECORD_COLUMNS);
    columns.push("Error");
    columns
}

/// One resolved input row.
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub query: Query,
    pub outcome: Resolution,
}

impl BatchRow {
    /// Cells present for this row, keyed by column label.
    ///
    /// Resolved rows carry the record columns; failed rows carry `Error`.
    pub fn cells(&self) -> IndexMap<&'static str, String> {
        let mut cells = IndexMap::new();
        cells.insert("Gene", self.query.gene.clone());
        cells.insert("Variant", self.query.variant.clone());
        match &self.outcome {
            Ok(record) => cells.extend(record.fields()),
            Err(failure) => {
                cells.insert("Error", failure.to_string());
            }
        }
        cells
    }
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub failed: usize,
    /// Failures by kind (`search_error`, `none_found`, `gene_mismatch`).
    pub failures_by_kind: IndexMap<&'static str, usize>,
}

impl BatchSummary {
    /// Summarize a set of rows.
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match &row.outcome {
                Ok(_) => summary.resolved += 1,
                Err(failure) => {
                    summary.failed += 1;
                    *summary.failures_by_kind.entry(failure.kind()).or_insert(0) += 1;
                }
            }
        }
        summary
    }
}

/// Resolves queries one by one, pausing between calls.
pub struct BatchDriver {
    resolver: Resolver,
    pacer: Arc<dyn Pacer>,
}

impl BatchDriver {
    /// Create a driver with the default one-second delay.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            pacer: Arc::new(FixedDelay::default()),
        }
    }

    /// Replace the pause policy.
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Arc::new(pacer);
        self
    }

    /// Get the resolver used for each row.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve every non-blank query.
    pub fn run(&self, queries: &[Query]) -> Vec<BatchRow> {
        self.run_with_progress(queries, |_, _, _| {})
    }

    /// Resolve every non-blank query, reporting each finished row as
    /// `(position, total, row)` with a 1-based position.
    pub fn run_with_progress(
        &self,
        queries: &[Query],
        mut on_row: impl FnMut(usize, usize, &BatchRow),
    ) -> Vec<BatchRow> {
        let pending: Vec<&Query> = queries.iter().filter(|q| !q.is_blank()).collect();
        if pending.len() < queries.len() {
            debug!(skipped = queries.len() - pending.len(), "Skipping blank rows");
        }

        let total = pending.len();
        let mut rows = Vec::with_capacity(total);

        for (i, query) in pending.into_iter().enumerate() {
            if i > 0 {
                self.pacer.pause();
            }

            info!(row = i + 1, total, gene = %query.gene, variant = %query.variant, "Querying");
            let row = BatchRow {
                query: query.clone(),
                outcome: self.resolver.resolve_query(query),
            };
            on_row(i + 1, total, &row);
            rows.push(row);
        }

        rows
    }
}
