use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::core::types::{FragmentId, MatchStatus};
use crate::matching::engine::Assignment;
use crate::output::OutputError;
use crate::parsing::naming::page_number;

/// Column order of the association report
pub const REPORT_COLUMNS: [&str; 5] = ["page", "article_00", "article_01", "similarity", "status"];

/// One row of the association report: the fate of one head fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    /// Zero-padded page of the head
    pub page: String,
    /// Head identity
    pub article_00: FragmentId,
    /// Paired tail, empty when unmatched
    pub article_01: Option<FragmentId>,
    /// Score with four decimals, empty when unmatched
    pub similarity: Option<String>,
    pub status: MatchStatus,
}

impl AssociationRecord {
    #[must_use]
    pub fn matched(head: &FragmentId, tail: &FragmentId, score: f64) -> Self {
        Self {
            page: page_number(head.as_str()),
            article_00: head.clone(),
            article_01: Some(tail.clone()),
            similarity: Some(format!("{score:.4}")),
            status: MatchStatus::Matched,
        }
    }

    #[must_use]
    pub fn unmatched(head: &FragmentId) -> Self {
        Self {
            page: page_number(head.as_str()),
            article_00: head.clone(),
            article_01: None,
            similarity: None,
            status: MatchStatus::Unmatched,
        }
    }
}

/// One record per head: matched pairs in selection order, then unmatched heads
#[must_use]
pub fn build_records(assignment: &Assignment) -> Vec<AssociationRecord> {
    assignment
        .matched
        .iter()
        .map(|m| AssociationRecord::matched(&m.head, &m.tail, m.score))
        .chain(assignment.unmatched.iter().map(AssociationRecord::unmatched))
        .collect()
}

/// Serialize records as CSV with a header row, even when there are no records
///
/// # Errors
///
/// Returns `OutputError::Csv` if serialization or writing fails.
pub fn write_records<W: Write>(records: &[AssociationRecord], writer: W) -> Result<(), OutputError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(REPORT_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the report to `path` atomically: a temporary file in the same
/// directory is filled and then renamed over the destination.
///
/// # Errors
///
/// Returns `OutputError::Io` if the directory or file cannot be written, or
/// `OutputError::Csv` if serialization fails.
pub fn write_report(records: &[AssociationRecord], path: &Path) -> Result<(), OutputError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    write_records(records, temp.as_file_mut())?;
    temp.persist(path).map_err(|e| OutputError::Io(e.error))?;

    info!("Association report written: {}", path.display());
    Ok(())
}

/// Read a report back
///
/// # Errors
///
/// Returns `OutputError::Csv` if the file cannot be read or parsed.
pub fn read_report(path: &Path) -> Result<Vec<AssociationRecord>, OutputError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<AssociationRecord>, csv::Error>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::MatchedPair;
    use tempfile::TempDir;

    fn assignment() -> Assignment {
        Assignment {
            matched: vec![MatchedPair {
                head: FragmentId::new("J_page_3_article_00_2.txt"),
                tail: FragmentId::new("J_page_4_article_01_1.txt"),
                score: 0.912_345,
            }],
            unmatched: vec![FragmentId::new("J_page_12_article_00_1.txt")],
        }
    }

    #[test]
    fn test_build_records() {
        let records = build_records(&assignment());
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].page, "003");
        assert_eq!(records[0].similarity.as_deref(), Some("0.9123"));
        assert_eq!(records[0].status, MatchStatus::Matched);

        assert_eq!(records[1].page, "012");
        assert_eq!(records[1].article_01, None);
        assert_eq!(records[1].similarity, None);
        assert_eq!(records[1].status, MatchStatus::Unmatched);
    }

    #[test]
    fn test_write_records_format() {
        let mut buffer = Vec::new();
        write_records(&build_records(&assignment()), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(
            text,
            "page,article_00,article_01,similarity,status\n\
             003,J_page_3_article_00_2.txt,J_page_4_article_01_1.txt,0.9123,Matched\n\
             012,J_page_12_article_00_1.txt,,,Unmatched\n"
        );
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut buffer = Vec::new();
        write_records(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "page,article_00,article_01,similarity,status\n"
        );
    }

    #[test]
    fn test_write_and_read_report() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("associations/association_report.csv");
        let records = build_records(&assignment());

        write_report(&records, &path).unwrap();
        // Rewriting replaces the file
        write_report(&records, &path).unwrap();

        assert_eq!(read_report(&path).unwrap(), records);
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
