use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::core::layout::RunLayout;
use crate::detection::reference::has_trailing_reference;
use crate::parsing::loader::LoadError;
use crate::parsing::naming::has_role_token;

/// Which head-role OCR fragments were judged complete or incomplete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectionSummary {
    pub complete: Vec<String>,
    pub incomplete: Vec<String>,
}

impl DetectionSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.complete.len() + self.incomplete.len()
    }
}

/// Whether a fragment file ends with a reference code; unreadable files do not
fn file_has_reference(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(text) => has_trailing_reference(&text),
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            false
        }
    }
}

/// Copy every head-role OCR fragment lacking a trailing reference into the
/// incomplete directory, which becomes the head pool for association.
///
/// A missing OCR directory, or one with no head fragments, yields an empty
/// summary and leaves the incomplete directory untouched.
///
/// # Errors
///
/// Returns `LoadError::Io` if the incomplete directory cannot be created or a
/// fragment cannot be copied.
pub fn detect_incomplete(layout: &RunLayout, head_token: &str) -> Result<DetectionSummary, LoadError> {
    let ocr_dir = layout.ocr_text_dir();
    if !ocr_dir.is_dir() {
        warn!("OCR directory not found: {}", ocr_dir.display());
        return Ok(DetectionSummary::default());
    }

    let mut files: Vec<_> = WalkDir::new(&ocr_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_role_token(&e.file_name().to_string_lossy(), head_token))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();

    if files.is_empty() {
        warn!("No {head_token} fragments found in {}", ocr_dir.display());
        return Ok(DetectionSummary::default());
    }

    let incomplete_dir = layout.incomplete_dir();
    std::fs::create_dir_all(&incomplete_dir)?;
    info!("Checking {} fragments in {}", files.len(), ocr_dir.display());

    let mut summary = DetectionSummary::default();
    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        if file_has_reference(&path) {
            info!("Complete: {name}");
            summary.complete.push(name);
        } else {
            info!("Incomplete: {name}");
            std::fs::copy(&path, incomplete_dir.join(&name))?;
            summary.incomplete.push(name);
        }
    }

    info!(
        "{} incomplete article(s) copied to {}",
        summary.incomplete.len(),
        incomplete_dir.display()
    );
    Ok(summary)
}
