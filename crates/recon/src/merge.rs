//! Field precedence for identifier-matched record pairs.
//!
//! | Field            | Rule                                        |
//! |------------------|---------------------------------------------|
//! | `source_id`      | shared identifier                           |
//! | `title`          | left when it is a real title, else right    |
//! | `abstract`       | left when present, else right               |
//! | `authors`        | left when non-empty, else right             |
//! | `year`           | left when present, else right               |
//! | `url`            | left when present, else right               |
//! | `pdf_url`        | left when present, else right               |
//! | `pmc_url`        | left when present, else right               |
//! | `citation_count` | right when present, else 0                  |

use crate::model::{Provenance, Record};

/// Which side of a pair supplies a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Left value when present and non-empty, otherwise right.
    PreferLeft,
    /// Right value when present, otherwise the field default.
    PreferRight,
}

pub const TITLE_RULE: FieldRule = FieldRule::PreferLeft;
pub const ABSTRACT_RULE: FieldRule = FieldRule::PreferLeft;
pub const AUTHORS_RULE: FieldRule = FieldRule::PreferLeft;
pub const YEAR_RULE: FieldRule = FieldRule::PreferLeft;
pub const URL_RULE: FieldRule = FieldRule::PreferLeft;
pub const PDF_URL_RULE: FieldRule = FieldRule::PreferLeft;
pub const PMC_URL_RULE: FieldRule = FieldRule::PreferLeft;
pub const CITATION_RULE: FieldRule = FieldRule::PreferRight;

/// Merge an identifier-matched pair into one record.
pub fn merge_pair(left: &Record, right: &Record) -> Record {
    let title = match TITLE_RULE {
        FieldRule::PreferLeft if left.has_title() || !right.has_title() => left.title.clone(),
        FieldRule::PreferLeft => right.title.clone(),
        FieldRule::PreferRight if right.has_title() || !left.has_title() => right.title.clone(),
        FieldRule::PreferRight => left.title.clone(),
    };

    let authors = match AUTHORS_RULE {
        FieldRule::PreferLeft if !left.authors.is_empty() => left.authors.clone(),
        FieldRule::PreferLeft => right.authors.clone(),
        FieldRule::PreferRight if !right.authors.is_empty() => right.authors.clone(),
        FieldRule::PreferRight => left.authors.clone(),
    };

    let citation_count = match CITATION_RULE {
        FieldRule::PreferRight => Some(right.citation_count.unwrap_or(0)),
        FieldRule::PreferLeft => Some(left.citation_count.or(right.citation_count).unwrap_or(0)),
    };

    Record {
        source_id: left.source_id.clone().or_else(|| right.source_id.clone()),
        title,
        abstract_text: pick_text(ABSTRACT_RULE, &left.abstract_text, &right.abstract_text),
        authors,
        year: pick(YEAR_RULE, left.year, right.year),
        url: pick_text(URL_RULE, &left.url, &right.url),
        citation_count,
        pdf_url: pick_text(PDF_URL_RULE, &left.pdf_url, &right.pdf_url),
        pmc_url: pick_text(PMC_URL_RULE, &left.pmc_url, &right.pmc_url),
        provenance: Provenance::Both,
    }
}

/// Fold a later record carrying an identifier already in the pool into the
/// entry that holds it. Values on `kept` win; absent fields are filled.
pub fn fold_repeat(kept: &mut Record, later: &Record) {
    if !kept.has_title() && later.has_title() {
        kept.title = later.title.clone();
    }
    if kept.authors.is_empty() {
        kept.authors = later.authors.clone();
    }
    kept.abstract_text = pick_text(FieldRule::PreferLeft, &kept.abstract_text, &later.abstract_text);
    kept.year = kept.year.or(later.year);
    kept.url = pick_text(FieldRule::PreferLeft, &kept.url, &later.url);
    kept.citation_count = kept.citation_count.or(later.citation_count);
    kept.pdf_url = pick_text(FieldRule::PreferLeft, &kept.pdf_url, &later.pdf_url);
    kept.pmc_url = pick_text(FieldRule::PreferLeft, &kept.pmc_url, &later.pmc_url);
}

fn pick<T: Copy>(rule: FieldRule, left: Option<T>, right: Option<T>) -> Option<T> {
    match rule {
        FieldRule::PreferLeft => left.or(right),
        FieldRule::PreferRight => right.or(left),
    }
}

/// Like [`pick`], but a blank string does not count as present.
fn pick_text(rule: FieldRule, left: &Option<String>, right: &Option<String>) -> Option<String> {
    let present = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
    match rule {
        FieldRule::PreferLeft => present(left).or_else(|| present(right)),
        FieldRule::PreferRight => present(right).or_else(|| present(left)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TITLE_PLACEHOLDER;

    #[test]
    fn left_wins_title_right_wins_citations() {
        let left = Record::new("T").with_id("123");
        let right = Record::new("T2").with_id("123").with_citations(7);
        let merged = merge_pair(&left, &right);
        assert_eq!(merged.title, "T");
        assert_eq!(merged.citation_count, Some(7));
        assert_eq!(merged.source_id.as_deref(), Some("123"));
        assert_eq!(merged.provenance, Provenance::Both);
    }

    #[test]
    fn citations_ignore_left_value() {
        let left = Record::new("T").with_id("1").with_citations(40);
        let right = Record::new("T").with_id("1");
        assert_eq!(merge_pair(&left, &right).citation_count, Some(0));
    }

    #[test]
    fn right_fills_missing_left_fields() {
        let left = Record::new(TITLE_PLACEHOLDER).with_id("9");
        let mut right = Record::new("Real Title")
            .with_id("9")
            .with_year(2019)
            .with_authors(["A. Author"]);
        right.abstract_text = Some("abstract".into());
        right.pdf_url = Some("https://example.org/a.pdf".into());

        let merged = merge_pair(&left, &right);
        assert_eq!(merged.title, "Real Title");
        assert_eq!(merged.year, Some(2019));
        assert_eq!(merged.authors, vec!["A. Author"]);
        assert_eq!(merged.abstract_text.as_deref(), Some("abstract"));
        assert_eq!(merged.pdf_url.as_deref(), Some("https://example.org/a.pdf"));
    }

    #[test]
    fn blank_left_text_falls_back() {
        let mut left = Record::new("T").with_id("1");
        left.url = Some("  ".into());
        let mut right = Record::new("T").with_id("1");
        right.url = Some("https://right".into());
        assert_eq!(merge_pair(&left, &right).url.as_deref(), Some("https://right"));
    }

    #[test]
    fn left_values_kept_when_both_present() {
        let left = Record::new("L").with_id("1").with_year(2001).with_authors(["L1"]);
        let right = Record::new("R").with_id("1").with_year(2002).with_authors(["R1"]);
        let merged = merge_pair(&left, &right);
        assert_eq!(merged.year, Some(2001));
        assert_eq!(merged.authors, vec!["L1"]);
    }

    #[test]
    fn fold_keeps_existing_values_and_fills_gaps() {
        let mut kept = Record::new("Kept").with_id("5").with_citations(3);
        let mut later = Record::new("Later").with_id("5").with_year(2018).with_citations(9);
        later.pdf_url = Some("https://example.org/later.pdf".into());

        fold_repeat(&mut kept, &later);
        assert_eq!(kept.title, "Kept");
        assert_eq!(kept.citation_count, Some(3));
        assert_eq!(kept.year, Some(2018));
        assert_eq!(kept.pdf_url.as_deref(), Some("https://example.org/later.pdf"));
    }
}
