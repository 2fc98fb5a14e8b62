use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

use crate::core::fragment::{Fragment, FragmentPool};
use crate::core::types::{Language, Role};
use crate::parsing::language::detect_language;
use crate::parsing::naming::has_role_token;
use crate::parsing::normalize::normalize_text;
use crate::utils::validation::check_fragment_limit;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid score table format: {0}")]
    InvalidFormat(String),

    #[error("Fragment directory not found: {0}")]
    MissingDirectory(String),

    #[error("Too many fragments: {0} exceeds maximum allowed (100000)")]
    TooManyFragments(usize),
}

/// Normalized text and advisory language tag of one fragment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedText {
    pub text: String,
    pub language: Language,
}

impl LoadedText {
    /// Detect the language on the trimmed raw text, then normalize it
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            text: normalize_text(raw),
            language: detect_language(raw),
        }
    }
}

/// Read and normalize a single fragment.
///
/// Never fails: an unreadable or non-UTF-8 file yields empty text and an
/// `unknown` language so the run can continue.
#[must_use]
pub fn load_fragment(path: &Path, role: Role) -> Fragment {
    match std::fs::read_to_string(path) {
        Ok(raw) => Fragment::from_raw(path, role, &raw),
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            Fragment::unreadable(path, role)
        }
    }
}

/// Contract form of [`load_fragment`] without a pool role: `(normalized_text, language_tag)`
#[must_use]
pub fn load_text(path: &Path) -> LoadedText {
    match std::fs::read_to_string(path) {
        Ok(raw) => LoadedText::from_raw(&raw),
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            LoadedText::default()
        }
    }
}

/// Load every `*{token}_*.txt` fragment in `dir` into a pool of `role`.
///
/// # Errors
///
/// Returns `LoadError::MissingDirectory` if `dir` does not exist,
/// `LoadError::Io` if it cannot be listed, or `LoadError::TooManyFragments`
/// if the limit is exceeded. Individual unreadable files do not fail the load.
pub fn load_pool(dir: &Path, role: Role, token: &str) -> Result<FragmentPool, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.display().to_string()));
    }

    let mut fragments = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !has_role_token(&name, token) || !entry.path().is_file() {
            continue;
        }

        if check_fragment_limit(fragments.len()).is_some() {
            return Err(LoadError::TooManyFragments(fragments.len()));
        }

        fragments.push(load_fragment(&entry.path(), role));
    }

    let pool = FragmentPool::new(role, fragments);
    info!(
        "{} {role} fragments found in {}",
        pool.len(),
        dir.display()
    );
    Ok(pool)
}

/// Number of `*{token}_*.txt` files in `dir`, 0 when it cannot be listed
#[must_use]
pub fn count_fragments(dir: &Path, token: &str) -> usize {
    std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .filter(|e| has_role_token(&e.file_name().to_string_lossy(), token))
        .count()
}
