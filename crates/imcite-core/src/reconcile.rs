//! Reconciliation run over a whole bibliography
//!
//! Runs the matcher across all entries with bounded concurrency and
//! folds the results on the collecting task, so the rename map and
//! unmatched list never need locking inside workers. The worker bound
//! exists because the remote service rate-limits aggressive clients.
//!
//! Output entries arrive in completion order, not input order; callers
//! that care about ordering must sort themselves.

use futures::StreamExt;
use imcite_bibtex::Entry;

use crate::inspire::LiteratureSource;
use crate::matcher::match_entry;
use crate::rename::RenameMap;

/// Concurrent remote lookups; matches what the service tolerates.
pub const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub workers: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Everything a reconcile run produces.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Updated entry set, completion-ordered.
    pub entries: Vec<Entry>,
    /// Old key to canonical key, first writer wins.
    pub renames: RenameMap,
    /// Keys of entries with no acceptable remote record.
    pub unmatched: Vec<String>,
}

/// Match every entry against the remote database. `progress` fires
/// once per completed entry and is purely observational.
pub async fn reconcile<S, P>(
    source: &S,
    entries: Vec<Entry>,
    options: &ReconcileOptions,
    mut progress: P,
) -> ReconcileOutcome
where
    S: LiteratureSource + ?Sized,
    P: FnMut(),
{
    let mut outcome = ReconcileOutcome::default();

    let mut reports = futures::stream::iter(
        entries
            .into_iter()
            .map(|entry| async move { match_entry(source, entry).await }),
    )
    .buffer_unordered(options.workers.max(1));

    while let Some(report) = reports.next().await {
        progress();
        if let Some((old, new)) = report.rename {
            outcome.renames.insert(old, new);
        }
        if report.matched_via.is_none() {
            outcome.unmatched.push(report.entry.key.clone());
        }
        outcome.entries.push(report.entry);
    }

    tracing::info!(
        entries = outcome.entries.len(),
        renamed = outcome.renames.len(),
        unmatched = outcome.unmatched.len(),
        "reconciliation finished"
    );
    outcome
}
