//! `scholar-recon`: bibliographic record reconciliation engine.
//!
//! Pure engine crate: receives two pre-parsed record collections, returns
//! one deduplicated set with overlap statistics. No IO dependencies.

pub mod engine;
pub mod evidence;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod normalize;

pub use engine::reconcile;
pub use matcher::{similarity_score, titles_match, TITLE_MATCH_THRESHOLD};
pub use model::{Provenance, RawRecord, ReconStats, ReconciledSet, Record};
pub use normalize::normalize_title;
