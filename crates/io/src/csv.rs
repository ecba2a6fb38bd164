// CSV export

use scholar_recon::Record;

use crate::error::IoError;
use crate::export::{export_row, EXPORT_COLUMNS};

/// Write records as CSV with a header row.
pub fn export_to_buffer(records: &[Record]) -> Result<Vec<u8>, IoError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| IoError::Export(e.to_string()))?;

    for record in records {
        let row: Vec<String> = export_row(record).iter().map(|c| c.display()).collect();
        writer
            .write_record(&row)
            .map_err(|e| IoError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| IoError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows() {
        let records = vec![
            Record::new("First, with comma").with_id("1").with_citations(5),
            Record::new("Second"),
        ];
        let bytes = export_to_buffer(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, EXPORT_COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "First, with comma");
        assert_eq!(&rows[0][6], "5");
        assert_eq!(&rows[1][0], "");
        assert_eq!(&rows[1][6], "0");
    }

    #[test]
    fn empty_set_is_header_only() {
        let bytes = export_to_buffer(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("source_id,title,abstract"));
    }
}
