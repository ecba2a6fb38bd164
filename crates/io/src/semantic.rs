// Semantic Scholar bulk-search JSON import
//
// Payload shape: {"data": [{"paperId": ..., "title": ..., ...}, ...]}.
// Every field may be missing or null.

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use scholar_recon::{RawRecord, Record};

use crate::error::IoError;
use crate::sources::{scalar_count, scalar_text};

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    #[serde(default)]
    paper_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    url: Option<String>,
    /// Usually an integer; some payloads carry it as a string.
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    authors: Option<Vec<Author>>,
    #[serde(default)]
    citation_count: Option<Value>,
    #[serde(default)]
    open_access_pdf: Option<OpenAccessPdf>,
    #[serde(default)]
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAccessPdf {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    /// PMID; the join key against PubMed records.
    #[serde(default, rename = "PubMed")]
    pubmed: Option<String>,
}

impl From<Paper> for RawRecord {
    fn from(paper: Paper) -> Self {
        // Names containing commas would be split again by the author parser.
        let authors = paper.authors.map(|list| {
            list.into_iter()
                .filter_map(|a| a.name)
                .map(|n| n.replace(',', " "))
                .collect::<Vec<_>>()
                .join(", ")
        });

        if paper.paper_id.is_none() {
            debug!("semantic: paper without paperId");
        }

        RawRecord {
            source_id: paper.external_ids.and_then(|ids| ids.pubmed),
            title: paper.title,
            abstract_text: paper.abstract_text,
            authors,
            year: paper.year.and_then(scalar_text),
            url: paper.url,
            citation_count: Some(paper.citation_count.and_then(scalar_count).unwrap_or(0)),
            pdf_url: paper.open_access_pdf.and_then(|pdf| pdf.url),
            pmc_url: None,
        }
    }
}

/// Parse a bulk-search response body into records.
pub fn parse_semantic_json(json: &str) -> Result<Vec<Record>, IoError> {
    let page: SearchPage = serde_json::from_str(json).map_err(|e| IoError::Parse {
        format: "Semantic Scholar JSON",
        message: e.to_string(),
    })?;
    debug!("semantic: parsed {} papers", page.data.len());
    Ok(page
        .data
        .into_iter()
        .map(|p| Record::from(RawRecord::from(p)))
        .collect())
}
