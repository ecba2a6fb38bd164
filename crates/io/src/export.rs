// Tabular export of reconciled records
//
// One row per record, fixed column order. Encoders live in `csv` and `xlsx`.

use scholar_config::{ExportFormat, ExportSettings};
use scholar_recon::Record;

use crate::error::IoError;

pub const EXPORT_COLUMNS: [&str; 9] = [
    "source_id",
    "title",
    "abstract",
    "authors",
    "year",
    "url",
    "citation_count",
    "pdf_url",
    "pmc_url",
];

/// A single exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Empty,
    Text(String),
    Number(f64),
}

impl ExportCell {
    fn text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::Text(v.to_string()),
            _ => Self::Empty,
        }
    }

    /// Display form used by text encoders.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
        }
    }
}

/// Cells for one record, aligned with [`EXPORT_COLUMNS`].
pub fn export_row(record: &Record) -> [ExportCell; 9] {
    [
        ExportCell::text(record.source_id.as_deref()),
        ExportCell::Text(record.title.clone()),
        ExportCell::text(record.abstract_text.as_deref()),
        ExportCell::text(Some(&record.authors.join(", "))),
        record
            .year
            .map(|y| ExportCell::Number(f64::from(y)))
            .unwrap_or(ExportCell::Empty),
        ExportCell::text(record.url.as_deref()),
        ExportCell::Number(record.citations() as f64),
        ExportCell::text(record.pdf_url.as_deref()),
        ExportCell::text(record.pmc_url.as_deref()),
    ]
}

/// Encode records in the requested format.
pub fn encode(
    records: &[Record],
    format: ExportFormat,
    settings: &ExportSettings,
) -> Result<Vec<u8>, IoError> {
    match format {
        ExportFormat::Xlsx => crate::xlsx::export_to_buffer(records, &settings.sheet_name),
        ExportFormat::Csv => crate::csv::export_to_buffer(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_follows_column_order() {
        let mut r = Record::new("Title")
            .with_id("42")
            .with_year(2020)
            .with_authors(["A One", "B Two"]);
        r.url = Some("http://x/42".into());

        let row = export_row(&r);
        assert_eq!(row.len(), EXPORT_COLUMNS.len());
        assert_eq!(row[0], ExportCell::Text("42".into()));
        assert_eq!(row[1], ExportCell::Text("Title".into()));
        assert_eq!(row[2], ExportCell::Empty);
        assert_eq!(row[3], ExportCell::Text("A One, B Two".into()));
        assert_eq!(row[4], ExportCell::Number(2020.0));
        assert_eq!(row[5].display(), "http://x/42");
        // Absent citation count exports as zero.
        assert_eq!(row[6], ExportCell::Number(0.0));
        assert_eq!(row[8], ExportCell::Empty);
    }

    #[test]
    fn number_display_has_no_fraction() {
        assert_eq!(ExportCell::Number(2021.0).display(), "2021");
        assert_eq!(ExportCell::Number(0.0).display(), "0");
    }
}
