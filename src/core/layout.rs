use std::path::{Path, PathBuf};

/// Directory holding OCR output (all segments, tails included)
pub const OCR_TEXT_DIR: &str = "ocr_text";
/// Directory holding head fragments flagged as incomplete
pub const INCOMPLETE_DIR: &str = "incomplets";
/// Root of the reconstruction tree
pub const COMPLETE_ARTICLES_DIR: &str = "complete_articles";
/// Directory receiving the association report
pub const ASSOCIATIONS_DIR: &str = "associations";
/// Archive of page-segment images
pub const SEGMENT_DIR: &str = "segment";

pub const REPORT_FILE_NAME: &str = "association_report.csv";
pub const EXPORT_FILE_NAME: &str = "articles_final.json";

/// Paths of one pipeline run folder, e.g. `output/Daily - ar - 2025-08-04`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn ocr_text_dir(&self) -> PathBuf {
        self.root.join(OCR_TEXT_DIR)
    }

    #[must_use]
    pub fn incomplete_dir(&self) -> PathBuf {
        self.root.join(INCOMPLETE_DIR)
    }

    #[must_use]
    pub fn complete_articles_dir(&self) -> PathBuf {
        self.root.join(COMPLETE_ARTICLES_DIR)
    }

    #[must_use]
    pub fn associations_dir(&self) -> PathBuf {
        self.root.join(ASSOCIATIONS_DIR)
    }

    #[must_use]
    pub fn segment_dir(&self) -> PathBuf {
        self.root.join(SEGMENT_DIR)
    }

    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.associations_dir().join(REPORT_FILE_NAME)
    }

    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.root.join(EXPORT_FILE_NAME)
    }

    /// Final component of the run folder, used for journal/lang/date metadata
    #[must_use]
    pub fn folder_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = RunLayout::new("/out/Daily - ar - 2025-08-04");
        assert_eq!(
            layout.report_path(),
            PathBuf::from("/out/Daily - ar - 2025-08-04/associations/association_report.csv")
        );
        assert_eq!(
            layout.segment_dir(),
            PathBuf::from("/out/Daily - ar - 2025-08-04/segment")
        );
        assert_eq!(layout.folder_name(), "Daily - ar - 2025-08-04");
    }
}
