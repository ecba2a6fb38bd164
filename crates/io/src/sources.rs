// Source payload loading
//
// Picks an adapter for a file (explicitly or by sniffing) and returns
// canonical records.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use scholar_recon::{RawRecord, Record};

use crate::error::IoError;
use crate::pubmed::parse_pubmed_xml;
use crate::semantic::parse_semantic_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// PubMed efetch XML.
    PubMedXml,
    /// Semantic Scholar bulk-search JSON (`{"data": [...]}`).
    SemanticJson,
    /// JSON array of records as written by `reconcile --output`.
    RecordsJson,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PubMedXml => "pubmed-xml",
            Self::SemanticJson => "semantic-json",
            Self::RecordsJson => "records-json",
        }
    }

    /// Infer the format from the file extension, then from the content.
    pub fn detect(path: &Path, content: &str) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xml") => Some(Self::PubMedXml),
            Some("json") => Self::sniff_json(content),
            _ => Self::sniff(content),
        }
    }

    fn sniff(content: &str) -> Option<Self> {
        if content.trim_start().starts_with('<') {
            Some(Self::PubMedXml)
        } else {
            Self::sniff_json(content)
        }
    }

    fn sniff_json(content: &str) -> Option<Self> {
        match content.trim_start().chars().next()? {
            '[' => Some(Self::RecordsJson),
            '{' => Some(Self::SemanticJson),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pubmed-xml" | "pubmed" | "xml" => Ok(Self::PubMedXml),
            "semantic-json" | "semantic" => Ok(Self::SemanticJson),
            "records-json" | "records" => Ok(Self::RecordsJson),
            other => Err(format!(
                "unknown source format '{other}' (expected pubmed-xml, semantic-json, records-json)"
            )),
        }
    }
}

/// One element of a records-JSON array, read without trusting its types.
///
/// Scalars may arrive as strings or numbers and any field may be missing or
/// null; everything is routed through [`RawRecord`] so the usual defaults
/// apply.
#[derive(Debug, Default, Deserialize)]
struct LooseRecord {
    #[serde(default)]
    source_id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<Value>,
    #[serde(default)]
    authors: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    citation_count: Option<Value>,
    #[serde(default)]
    pdf_url: Option<Value>,
    #[serde(default)]
    pmc_url: Option<Value>,
}

impl LooseRecord {
    fn into_record(self) -> Record {
        // An author array is taken as-is; a string goes through the
        // comma-delimited parser.
        let (author_list, author_text) = match self.authors {
            Some(Value::Array(items)) => {
                let names: Vec<String> = items
                    .into_iter()
                    .filter_map(scalar_text)
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect();
                (Some(names), None)
            }
            other => (None, other.and_then(scalar_text)),
        };

        let raw = RawRecord {
            source_id: self.source_id.and_then(scalar_text),
            title: self.title.and_then(scalar_text),
            abstract_text: self.abstract_text.and_then(scalar_text),
            authors: author_text,
            year: self.year.and_then(scalar_text),
            url: self.url.and_then(scalar_text),
            citation_count: self.citation_count.and_then(scalar_count),
            pdf_url: self.pdf_url.and_then(scalar_text),
            pmc_url: self.pmc_url.and_then(scalar_text),
        };

        let mut record = Record::from(raw);
        if let Some(names) = author_list {
            record.authors = names;
        }
        record
    }
}

/// Text form of a JSON scalar. Arrays, objects and null carry no text.
pub(crate) fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Non-negative count from a number or a digit string.
pub(crate) fn scalar_count(value: Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a JSON array of records.
///
/// Only a payload that is not a JSON array fails. Elements that are not
/// objects are skipped with a warning; malformed fields fall back to their
/// defaults.
pub fn parse_records_json(json: &str) -> Result<Vec<Record>, IoError> {
    let items: Vec<Value> = serde_json::from_str(json).map_err(|e| IoError::Parse {
        format: "records JSON",
        message: e.to_string(),
    })?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<LooseRecord>(item) {
            Ok(loose) => records.push(loose.into_record()),
            Err(e) => warn!("records JSON: entry #{index} skipped: {e}"),
        }
    }
    Ok(records)
}

pub fn parse_records(content: &str, format: SourceFormat) -> Result<Vec<Record>, IoError> {
    match format {
        SourceFormat::PubMedXml => parse_pubmed_xml(content),
        SourceFormat::SemanticJson => parse_semantic_json(content),
        SourceFormat::RecordsJson => parse_records_json(content),
    }
}

/// Read and parse one source file. `format` overrides detection.
pub fn load_records(path: &Path, format: Option<SourceFormat>) -> Result<Vec<Record>, IoError> {
    let content = std::fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let format = match format.or_else(|| SourceFormat::detect(path, &content)) {
        Some(f) => f,
        None => {
            return Err(IoError::Parse {
                format: "source",
                message: format!("cannot detect the format of '{}'", path.display()),
            })
        }
    };

    let records = parse_records(&content, format)?;
    info!("loaded {} records from {} ({format})", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_recon::model::TITLE_PLACEHOLDER;
    use std::io::Write;

    #[test]
    fn detect_by_extension_and_content() {
        assert_eq!(
            SourceFormat::detect(Path::new("a.XML"), ""),
            Some(SourceFormat::PubMedXml)
        );
        assert_eq!(
            SourceFormat::detect(Path::new("a.json"), "  {\"data\": []}"),
            Some(SourceFormat::SemanticJson)
        );
        assert_eq!(
            SourceFormat::detect(Path::new("a.json"), "[]"),
            Some(SourceFormat::RecordsJson)
        );
        assert_eq!(
            SourceFormat::detect(Path::new("payload"), "<?xml version=\"1.0\"?>"),
            Some(SourceFormat::PubMedXml)
        );
        assert_eq!(SourceFormat::detect(Path::new("a.txt"), "hello"), None);
    }

    #[test]
    fn format_names_parse() {
        for f in [
            SourceFormat::PubMedXml,
            SourceFormat::SemanticJson,
            SourceFormat::RecordsJson,
        ] {
            assert_eq!(f.name().parse::<SourceFormat>().unwrap(), f);
        }
        assert!("yaml".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn records_json_fills_placeholder_title() {
        let records =
            parse_records_json(r#"[{"title": "", "source_id": "1"}, {"title": "Kept"}]"#).unwrap();
        assert_eq!(records[0].title, TITLE_PLACEHOLDER);
        assert_eq!(records[0].source_id.as_deref(), Some("1"));
        assert_eq!(records[1].title, "Kept");
        assert!(records[1].authors.is_empty());
    }

    #[test]
    fn records_json_missing_title_gets_placeholder() {
        let records =
            parse_records_json(r#"[{"source_id": "1", "title": "Ok"}, {"source_id": "2"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Ok");
        assert_eq!(records[1].title, TITLE_PLACEHOLDER);
        assert_eq!(records[1].source_id.as_deref(), Some("2"));
    }

    #[test]
    fn records_json_year_as_string_or_sentinel() {
        let records = parse_records_json(
            r#"[{"title": "A", "year": "2019"}, {"title": "B", "year": "N/A"}, {"title": "C", "year": 2020}, {"title": "D", "year": null}]"#,
        )
        .unwrap();
        let years: Vec<Option<i32>> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(2019), None, Some(2020), None]);
    }

    #[test]
    fn records_json_sentinels_are_cleaned() {
        let records = parse_records_json(
            r#"[{"title": "A", "source_id": "N/A", "pdf_url": "N/A", "abstract": "No abstract available", "citation_count": "12", "authors": ["Jane Smith", "Doe, J."]}]"#,
        )
        .unwrap();
        let r = &records[0];
        assert!(r.source_id.is_none());
        assert!(r.pdf_url.is_none());
        assert!(r.abstract_text.is_none());
        assert_eq!(r.citation_count, Some(12));
        assert_eq!(r.authors, vec!["Jane Smith", "Doe, J."]);
    }

    #[test]
    fn records_json_numeric_id_and_author_string() {
        let records =
            parse_records_json(r#"[{"title": "A", "source_id": 31000001, "authors": "A One, B Two"}]"#)
                .unwrap();
        assert_eq!(records[0].source_id.as_deref(), Some("31000001"));
        assert_eq!(records[0].authors, vec!["A One", "B Two"]);
    }

    #[test]
    fn records_json_non_object_entry_is_skipped() {
        let records = parse_records_json(r#"[42, {"title": "Kept"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn records_json_wrong_document_shape_is_error() {
        let err = parse_records_json(r#"{"title": "not an array"}"#).unwrap_err();
        assert!(matches!(err, IoError::Parse { format: "records JSON", .. }));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("missing.json"), None).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn explicit_format_overrides_detection() {
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(br#"[{"title": "Only"}]"#).unwrap();

        // Read as XML by extension: no articles.
        let as_xml = load_records(file.path(), None).map(|r| r.len()).unwrap_or(0);
        assert_eq!(as_xml, 0);
        let records = load_records(file.path(), Some(SourceFormat::RecordsJson)).unwrap();
        assert_eq!(records.len(), 1);
    }
}
