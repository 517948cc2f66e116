//! Core engine for imcite
//!
//! Reconciles a local BibTeX bibliography against the INSPIRE-HEP
//! literature database and propagates citation-key renames into LaTeX
//! documents. Three pieces, leaves first:
//!
//! - [`matcher`]: per-entry candidate queries and match acceptance
//! - [`reconcile`]: bounded-concurrency run over all entries
//! - [`rewrite`]: citation-key replacement in `.tex` files, with
//!   pre-image backups
//!
//! The rename map produced by a reconcile run can be persisted
//! ([`rename::RenameMap::save`]) and loaded by a later run, so the
//! rewriting step also works standalone.

pub mod bibliography;
pub mod error;
pub mod http;
pub mod inspire;
pub mod matcher;
pub mod reconcile;
pub mod rename;
pub mod rewrite;

pub use error::{Error, Result};
pub use inspire::{InspireSource, LiteratureSource};
pub use matcher::{candidate_queries, match_entry, CandidateQuery, MatchReport, QueryKind};
pub use reconcile::{reconcile, ReconcileOptions, ReconcileOutcome};
pub use rename::RenameMap;
pub use rewrite::{rewrite_file, rewrite_target, rewrite_text, RewriteSummary};
