//! PubMed to Semantic Scholar query rewrite.
//!
//! A textual rewrite, not a parser: field tags are dropped, date limits are
//! cut off and boolean operators are swapped for the bulk-search symbols.

const FIELD_TAG: &str = "[Title/Abstract]";
const DATE_TAG: &str = "[pdat]";

/// Translate PubMed search syntax to Semantic Scholar bulk-search syntax.
///
/// ```
/// use scholar_cli::query::translate_pubmed_to_semantic;
/// assert_eq!(
///     translate_pubmed_to_semantic("(cancer[Title/Abstract] AND therapy)"),
///     "(cancer + therapy)"
/// );
/// ```
pub fn translate_pubmed_to_semantic(pubmed_query: &str) -> String {
    let without_fields = pubmed_query.replace(FIELD_TAG, "");

    let without_dates = match without_fields.find(DATE_TAG) {
        Some(idx) => &without_fields[..idx],
        None => without_fields.as_str(),
    };

    let query = without_dates.replace(" AND ", " + ").replace(" OR ", " | ");
    let query = query.trim();

    if query.contains('(') {
        query.to_string()
    } else {
        format!("({query})")
    }
}
