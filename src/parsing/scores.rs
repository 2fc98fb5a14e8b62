use std::path::Path;

use crate::core::types::FragmentId;
use crate::parsing::loader::LoadError;

/// One precomputed score between a head and a tail
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub head: FragmentId,
    pub tail: FragmentId,
    pub score: f64,
}

/// Parse a score table file with columns: head, tail, score
///
/// The delimiter is a comma for `.csv` files and a tab otherwise.
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be read, or
/// `LoadError::InvalidFormat` if the content is invalid.
pub fn parse_score_file(path: &Path) -> Result<Vec<ScoreEntry>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    };
    parse_score_text(&content, delimiter)
}

/// Parse score table text with columns: head, tail, score
///
/// Fields may be quoted, so fragment names can contain the delimiter. Blank
/// lines and `#` comments are skipped, and a first record starting with
/// `head` or `article_00` is treated as a header.
///
/// # Errors
///
/// Returns `LoadError::InvalidFormat` if a record is malformed, has fewer
/// than 3 fields, or has a score that is not a finite number in [0, 1].
pub fn parse_score_text(text: &str, delimiter: u8) -> Result<Vec<ScoreEntry>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    let mut first_record = true;

    for result in reader.records() {
        let record = result.map_err(|e| LoadError::InvalidFormat(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_num = record.position().map_or(0, csv::Position::line);

        if std::mem::take(&mut first_record) {
            let first = record.get(0).map(str::to_lowercase).unwrap_or_default();
            if first == "head" || first == "article_00" {
                continue;
            }
        }

        let (Some(head), Some(tail), Some(raw_score)) = (record.get(0), record.get(1), record.get(2))
        else {
            return Err(LoadError::InvalidFormat(format!(
                "Line {line_num} has fewer than 3 fields"
            )));
        };

        let score: f64 = raw_score.parse().map_err(|_| {
            LoadError::InvalidFormat(format!("Invalid score on line {line_num}: '{raw_score}'"))
        })?;
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(LoadError::InvalidFormat(format!(
                "Score on line {line_num} is outside [0, 1]: {score}"
            )));
        }

        entries.push(ScoreEntry {
            head: FragmentId::new(head),
            tail: FragmentId::new(tail),
            score,
        });
    }

    Ok(entries)
}
