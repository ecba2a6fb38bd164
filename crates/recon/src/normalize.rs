//! Title normalization.
//!
//! Every title comparison in the engine goes through [`normalize_title`];
//! comparing a normalized title against a raw one is a bug.

/// Mis-encoded remnant of a UTF-8 quote/dash read as Windows-1252
/// (`"\u{e2}\u{20ac}"`), as it appears in scraped titles after lower-casing.
pub const ENCODING_ARTIFACT: &str = "\u{e2}\u{20ac}";

/// Reduce a title to its comparison form: lower-case, ASCII punctuation
/// removed, encoding artifact removed.
pub fn normalize_title(title: &str) -> String {
    let mut out: String = title
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    // Removing one artifact can splice two halves into a new one.
    while out.contains(ENCODING_ARTIFACT) {
        out = out.replace(ENCODING_ARTIFACT, "");
    }
    out
}
