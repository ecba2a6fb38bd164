// File I/O operations
//
// Source adapters turn already-fetched upstream payloads into records;
// encoders turn a reconciled set into a downloadable table.

pub mod csv;
pub mod error;
pub mod export;
pub mod pubmed;
pub mod semantic;
pub mod sources;
pub mod xlsx;

pub use error::IoError;
pub use export::{encode, export_row, ExportCell, EXPORT_COLUMNS};
pub use pubmed::parse_pubmed_xml;
pub use semantic::parse_semantic_json;
pub use sources::{load_records, parse_records, parse_records_json, SourceFormat};
