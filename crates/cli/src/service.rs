//! Search service: reconcile two source collections, keep the result under a
//! session handle, export it later by handle.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use scholar_cache::{CacheConfig, Clock, RealClock, ResultCache, SessionHandle};
use scholar_config::{ExportFormat, ExportSettings, ScholarConfig};
use scholar_io::IoError;
use scholar_recon::{reconcile, ReconciledSet, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ServiceError {
    /// Handle unknown, unparsable, expired, or evicted.
    NotFound(String),
    /// Encoding the cached result failed.
    Export(IoError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "search '{id}' not found or expired"),
            Self::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Summary returned to the caller of [`SearchService::search`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub pubmed_results: usize,
    pub semantic_scholar_results: usize,
    pub unique_to_pubmed: usize,
    pub unique_to_semantic: usize,
    pub duplicate_count: usize,
    /// Deduplicated records; citation counts are always present here.
    pub papers: Vec<Record>,
    pub search_id: String,
}

impl SearchResponse {
    fn new(set: &ReconciledSet, handle: SessionHandle) -> Self {
        let papers = set
            .records
            .iter()
            .map(|r| Record {
                citation_count: Some(r.citations()),
                ..r.clone()
            })
            .collect();

        Self {
            pubmed_results: set.stats.left_total,
            semantic_scholar_results: set.stats.right_total,
            unique_to_pubmed: set.stats.unique_to_left,
            unique_to_semantic: set.stats.unique_to_right,
            duplicate_count: set.stats.duplicate_count,
            papers,
            search_id: handle.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Owns the result cache. Share it behind an `Arc`; every method takes `&self`.
pub struct SearchService<C: Clock = RealClock> {
    cache: ResultCache<ReconciledSet, C>,
    export: ExportSettings,
}

impl SearchService<RealClock> {
    pub fn new(config: &ScholarConfig) -> Self {
        Self::with_clock(config, RealClock)
    }
}

impl<C: Clock> SearchService<C> {
    pub fn with_clock(config: &ScholarConfig, clock: C) -> Self {
        let cache_config = CacheConfig {
            max_size: config.cache.max_size,
            ttl: config.cache.ttl(),
        };
        Self {
            cache: ResultCache::with_clock(cache_config, clock),
            export: config.export.clone(),
        }
    }

    /// Reconcile `pubmed` (bibliographic precedence) with `semantic`
    /// (citation source) and cache the result.
    pub fn search(&self, pubmed: Vec<Record>, semantic: Vec<Record>) -> SearchResponse {
        let set = reconcile(pubmed, semantic);
        let response_set = set.clone();
        let handle = self.cache.put(set);

        info!(
            "search {handle}: {} records ({} duplicates removed)",
            response_set.len(),
            response_set.stats.duplicate_count
        );
        SearchResponse::new(&response_set, handle)
    }

    /// Look up a cached result by its string handle.
    pub fn get(&self, search_id: &str) -> Result<Arc<ReconciledSet>, ServiceError> {
        let handle: SessionHandle = search_id
            .parse()
            .map_err(|_| ServiceError::NotFound(search_id.to_string()))?;
        self.cache.get(&handle).ok_or_else(|| {
            debug!("search {search_id}: cache miss");
            ServiceError::NotFound(search_id.to_string())
        })
    }

    /// Encode a cached result. `format` overrides the configured default.
    pub fn export(
        &self,
        search_id: &str,
        format: Option<ExportFormat>,
    ) -> Result<Vec<u8>, ServiceError> {
        let set = self.get(search_id)?;
        let format = format.unwrap_or(self.export.format);
        scholar_io::encode(&set.records, format, &self.export).map_err(ServiceError::Export)
    }

    /// Live plus not-yet-swept entries.
    pub fn cached_searches(&self) -> usize {
        self.cache.len()
    }
}
