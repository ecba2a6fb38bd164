// PubMed efetch XML import
//
// Reads a `PubmedArticleSet` document (db=pubmed, retmode=xml) into raw
// records. Only the fields the reconciler uses are extracted.

use log::{debug, warn};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use scholar_recon::{RawRecord, Record};

use crate::error::IoError;

const PUBMED_URL: &str = "http://www.ncbi.nlm.nih.gov/pubmed";
const PMC_URL: &str = "http://www.ncbi.nlm.nih.gov/pmc/articles";

/// Element whose text is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    Abstract,
    ForeName,
    LastName,
    CollectiveName,
    Year,
    MedlineDate,
    PmcId,
}

#[derive(Debug, Default)]
struct AuthorParts {
    fore: String,
    last: String,
    collective: String,
}

impl AuthorParts {
    fn display_name(&self) -> Option<String> {
        let name = format!("{} {}", self.fore.trim(), self.last.trim());
        let name = name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
        let collective = self.collective.trim();
        (!collective.is_empty()).then(|| collective.to_string())
    }
}

/// Fields gathered for one `PubmedArticle`.
#[derive(Debug, Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: Option<String>,
    abstract_sections: Vec<String>,
    authors: Vec<String>,
    year: Option<String>,
    medline_date: Option<String>,
    pmc_id: Option<String>,
}

impl ArticleBuilder {
    fn finish(self, index: usize) -> Option<RawRecord> {
        let Some(pmid) = self.pmid.filter(|p| !p.trim().is_empty()) else {
            warn!("pubmed: article #{index} has no PMID, skipped");
            return None;
        };
        let pmid = pmid.trim().to_string();

        let year = self.year.or_else(|| {
            self.medline_date
                .as_deref()
                .and_then(|d| d.split_whitespace().next())
                .map(str::to_string)
        });

        let abstract_text = if self.abstract_sections.is_empty() {
            None
        } else {
            Some(self.abstract_sections.join(" "))
        };

        Some(RawRecord {
            url: Some(format!("{PUBMED_URL}/{pmid}")),
            pmc_url: self.pmc_id.map(|pmc| format!("{PMC_URL}/{}", pmc.trim())),
            source_id: Some(pmid),
            title: self.title,
            abstract_text,
            authors: Some(self.authors.join(", ")),
            year,
            citation_count: None,
            pdf_url: None,
        })
    }
}

/// Parse an efetch XML payload into records.
///
/// Articles without a PMID are skipped with a warning; an XML syntax error
/// aborts the whole payload.
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<Record>, IoError> {
    let mut reader = Reader::from_str(xml);
    // Inline markup splits text into several events; keep their spacing.
    reader.config_mut().trim_text(false);

    let mut records = Vec::new();
    let mut article: Option<ArticleBuilder> = None;
    let mut author: Option<AuthorParts> = None;
    let mut article_index = 0usize;

    // Open element names, outermost first.
    let mut path: Vec<Vec<u8>> = Vec::new();
    // Field being captured and the depth of the element that opened it.
    let mut capture: Option<(Field, usize)> = None;
    let mut text = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                let parent = path.last().map(Vec::as_slice);

                match name.as_slice() {
                    b"PubmedArticle" => article = Some(ArticleBuilder::default()),
                    b"Author" if parent == Some(b"AuthorList".as_slice()) => {
                        author = Some(AuthorParts::default())
                    }
                    _ => {}
                }

                if capture.is_none() && article.is_some() {
                    let field = match (name.as_slice(), parent) {
                        (b"PMID", Some(b"MedlineCitation")) => Some(Field::Pmid),
                        (b"ArticleTitle", _) => Some(Field::Title),
                        (b"AbstractText", Some(b"Abstract")) => Some(Field::Abstract),
                        (b"ForeName", Some(b"Author")) => Some(Field::ForeName),
                        (b"LastName", Some(b"Author")) => Some(Field::LastName),
                        (b"CollectiveName", Some(b"Author")) => Some(Field::CollectiveName),
                        (b"Year", Some(b"PubDate")) => Some(Field::Year),
                        (b"MedlineDate", Some(b"PubDate")) => Some(Field::MedlineDate),
                        (b"ArticleId", Some(b"ArticleIdList"))
                            if in_pubmed_data(&path) && is_pmc_id(e) =>
                        {
                            Some(Field::PmcId)
                        }
                        _ => None,
                    };
                    if let Some(field) = field {
                        capture = Some((field, path.len() + 1));
                        text.clear();
                    }
                }

                path.push(name);
            }
            // Entity references arrive separately as `GeneralRef`.
            Ok(Event::Text(ref e)) if capture.is_some() => {
                let decoded = e.decode().map_err(|err| IoError::Parse {
                    format: "PubMed XML",
                    message: format!("at byte {}: {err}", reader.buffer_position()),
                })?;
                text.push_str(&decoded);
            }
            Ok(Event::GeneralRef(ref e)) if capture.is_some() => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else if let Ok(name) = e.decode() {
                    if let Some(resolved) = resolve_predefined_entity(&name) {
                        text.push_str(resolved);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if let Some((field, depth)) = capture {
                    if depth == path.len() {
                        let value = collapse_whitespace(&text);
                        if let Some(a) = article.as_mut() {
                            store_field(a, author.as_mut(), field, value);
                        }
                        capture = None;
                    }
                }

                match e.name().as_ref() {
                    b"Author" => {
                        if let (Some(a), Some(parts)) = (article.as_mut(), author.take()) {
                            if let Some(name) = parts.display_name() {
                                a.authors.push(name);
                            }
                        }
                    }
                    b"PubmedArticle" => {
                        if let Some(a) = article.take() {
                            if let Some(raw) = a.finish(article_index) {
                                records.push(Record::from(raw));
                            }
                        }
                        article_index += 1;
                    }
                    _ => {}
                }

                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IoError::Parse {
                    format: "PubMed XML",
                    message: format!("at byte {}: {e}", reader.buffer_position()),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    debug!("pubmed: parsed {} of {article_index} articles", records.len());
    Ok(records)
}

fn store_field(article: &mut ArticleBuilder, author: Option<&mut AuthorParts>, field: Field, value: String) {
    match field {
        Field::Pmid => {
            if article.pmid.is_none() {
                article.pmid = Some(value);
            }
        }
        Field::Title => article.title = Some(value),
        Field::Abstract => {
            if !value.is_empty() {
                article.abstract_sections.push(value);
            }
        }
        Field::Year => article.year = Some(value),
        Field::MedlineDate => article.medline_date = Some(value),
        Field::PmcId => {
            if article.pmc_id.is_none() && !value.is_empty() {
                article.pmc_id = Some(value);
            }
        }
        Field::ForeName | Field::LastName | Field::CollectiveName => {
            if let Some(parts) = author {
                match field {
                    Field::ForeName => parts.fore = value,
                    Field::LastName => parts.last = value,
                    _ => parts.collective = value,
                }
            }
        }
    }
}

/// `ArticleIdList` under `PubmedData` (reference lists carry their own).
fn in_pubmed_data(path: &[Vec<u8>]) -> bool {
    path.len() >= 2 && path[path.len() - 2].as_slice() == b"PubmedData"
}

fn is_pmc_id(e: &quick_xml::events::BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"IdType" && attr.value.as_ref() == b"pmc")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
