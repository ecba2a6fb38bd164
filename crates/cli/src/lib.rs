//! Library surface of the `scholar` CLI: the search service and the query
//! rewrite, usable without the command-line front end.

pub mod exit_codes;
pub mod query;
pub mod service;

pub use query::translate_pubmed_to_semantic;
pub use service::{SearchResponse, SearchService, ServiceError};
