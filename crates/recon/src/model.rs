use serde::{Deserialize, Serialize};

/// Placeholder used when an upstream record carries no usable title.
pub const TITLE_PLACEHOLDER: &str = "No title available";

/// Upstream strings that mean "no value" for identifier and link fields.
const MISSING_SENTINELS: &[&str] = &["N/A", "No PMID", "None", "nan"];

/// Upstream strings that mean "no value" in free-text fields.
const TEXT_SENTINELS: &[&str] = &["N/A", "No abstract available", "None", "nan"];

/// Upstream author strings that stand for an empty author list.
const AUTHOR_SENTINELS: &[&str] = &["N/A", "No authors listed"];

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Which input side(s) contributed a record's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Left,
    Right,
    /// Merged from an identifier-matched left/right pair.
    Both,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Both => write!(f, "both"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One bibliographic entry in canonical shape.
///
/// `title` is always present; a missing upstream title is represented by
/// [`TITLE_PLACEHOLDER`], never by an empty option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub source_id: Option<String>,
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub citation_count: Option<u64>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub pmc_url: Option<String>,
    #[serde(skip)]
    pub provenance: Provenance,
}

impl Record {
    /// A record with only a title; every other field absent.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            source_id: None,
            title: if title.trim().is_empty() { TITLE_PLACEHOLDER.to_string() } else { title },
            abstract_text: None,
            authors: Vec::new(),
            year: None,
            url: None,
            citation_count: None,
            pdf_url: None,
            pmc_url: None,
            provenance: Provenance::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = clean_identifier(Some(id.into()));
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_citations(mut self, count: u64) -> Self {
        self.citation_count = Some(count);
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// The stable cross-source identifier, if this record carries a usable one.
    pub fn identifier(&self) -> Option<&str> {
        self.source_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !is_sentinel(id, MISSING_SENTINELS))
    }

    /// True when the title is a real title rather than the placeholder.
    pub fn has_title(&self) -> bool {
        let t = self.title.trim();
        !t.is_empty() && t != TITLE_PLACEHOLDER
    }

    /// Citation count as reported downstream: absent reads as 0.
    pub fn citations(&self) -> u64 {
        self.citation_count.unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Raw upstream shape
// ---------------------------------------------------------------------------

/// Loosely-typed record as produced by a source adapter before defaults
/// are applied. Every textual field is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub source_id: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    /// Comma-delimited author names.
    pub authors: Option<String>,
    pub year: Option<String>,
    pub url: Option<String>,
    pub citation_count: Option<u64>,
    pub pdf_url: Option<String>,
    pub pmc_url: Option<String>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

        Record {
            source_id: clean_identifier(raw.source_id),
            title,
            abstract_text: clean_text(raw.abstract_text, TEXT_SENTINELS),
            authors: raw.authors.as_deref().map(parse_authors).unwrap_or_default(),
            year: raw.year.as_deref().and_then(parse_year),
            url: clean_text(raw.url, MISSING_SENTINELS),
            citation_count: raw.citation_count,
            pdf_url: clean_text(raw.pdf_url, MISSING_SENTINELS),
            pmc_url: clean_text(raw.pmc_url, MISSING_SENTINELS),
            provenance: Provenance::default(),
        }
    }
}

/// Parse a year field. Only an all-digit value counts; anything else is absent.
pub fn parse_year(value: &str) -> Option<i32> {
    let v = value.trim();
    if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    v.parse().ok()
}

/// Split a comma-delimited author field into trimmed, non-empty names.
pub fn parse_authors(value: &str) -> Vec<String> {
    if is_sentinel(value.trim(), AUTHOR_SENTINELS) {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty() && !is_sentinel(a, AUTHOR_SENTINELS))
        .map(str::to_string)
        .collect()
}

fn clean_identifier(value: Option<String>) -> Option<String> {
    clean_text(value, MISSING_SENTINELS).map(|v| v.trim().to_string())
}

fn clean_text(value: Option<String>, sentinels: &[&str]) -> Option<String> {
    value.filter(|v| !is_sentinel(v.trim(), sentinels))
}

fn is_sentinel(value: &str, sentinels: &[&str]) -> bool {
    value.is_empty() || sentinels.iter().any(|s| s.eq_ignore_ascii_case(value))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Overlap statistics for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconStats {
    pub left_total: usize,
    pub right_total: usize,
    pub unique_to_left: usize,
    pub unique_to_right: usize,
    /// Identifier overlap, folded repeats and fuzzy-title removals.
    pub duplicate_count: usize,
    /// Identifier overlap component of `duplicate_count`.
    pub identifier_overlap: usize,
    /// Same-side identifier repeats folded into an existing entry.
    pub repeated_identifiers: usize,
    /// Fuzzy-title component of `duplicate_count`.
    pub title_duplicates: usize,
}

/// Output of one reconciliation run: the deduplicated records in
/// first-seen order plus overlap statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledSet {
    pub records: Vec<Record>,
    pub stats: ReconStats,
}

impl ReconciledSet {
    pub fn empty() -> Self {
        Self { records: Vec::new(), stats: ReconStats::default() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_defaults_for_malformed_fields() {
        let raw = RawRecord {
            source_id: Some("N/A".into()),
            title: None,
            abstract_text: Some("No abstract available".into()),
            authors: Some(" Ada Lovelace, , Alan Turing ,".into()),
            year: Some("No year".into()),
            url: None,
            citation_count: None,
            pdf_url: Some("N/A".into()),
            pmc_url: None,
        };
        let rec = Record::from(raw);
        assert_eq!(rec.source_id, None);
        assert_eq!(rec.title, TITLE_PLACEHOLDER);
        assert!(!rec.has_title());
        assert_eq!(rec.abstract_text, None);
        assert_eq!(rec.authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(rec.year, None);
        assert_eq!(rec.pdf_url, None);
        assert_eq!(rec.citations(), 0);
    }

    #[test]
    fn year_must_be_all_digits() {
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year(" 1999 "), Some(1999));
        assert_eq!(parse_year("2021.0"), None);
        assert_eq!(parse_year("-5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn author_sentinel_yields_empty_list() {
        assert!(parse_authors("No authors listed").is_empty());
        assert!(parse_authors("").is_empty());
        assert_eq!(parse_authors("A,B"), vec!["A", "B"]);
    }

    #[test]
    fn identifier_ignores_sentinels_and_whitespace() {
        let mut rec = Record::new("T");
        rec.source_id = Some("  ".into());
        assert_eq!(rec.identifier(), None);
        rec.source_id = Some("N/A".into());
        assert_eq!(rec.identifier(), None);
        rec.source_id = Some(" 123 ".into());
        assert_eq!(rec.identifier(), Some("123"));
    }

    #[test]
    fn blank_title_becomes_placeholder() {
        assert_eq!(Record::new("   ").title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn record_json_uses_abstract_key() {
        let json = serde_json::json!({"title": "T", "abstract": "A", "year": 2020});
        let rec: Record = serde_json::from_value(json).unwrap();
        assert_eq!(rec.abstract_text.as_deref(), Some("A"));
        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["abstract"], "A");
        assert!(out.get("provenance").is_none());
    }
}
