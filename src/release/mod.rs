//! Release identity, deduplication, reconciliation and post composition.
//!
//! Everything in here is synchronous and free of I/O. The orchestrator in
//! [`crate::cli`] feeds scraped releases through [`dedupe_releases`], enriches
//! them, reconciles them against the stored history with [`reconcile`] and
//! turns the new ones into posts with [`compose_post`].

mod compose;
mod dedupe;
mod identity;
mod locale;
mod reconcile;

pub use compose::{ComposeError, compose_post, source_title};
pub use dedupe::{compare_popularity, dedupe_across_sources, dedupe_releases};
pub use identity::release_identity;
pub use locale::{Locale, hashtagify};
pub use reconcile::{ReconcileError, Reconciliation, latest_year, reconcile};
