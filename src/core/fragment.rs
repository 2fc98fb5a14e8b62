use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::types::{FragmentId, Language, Role};
use crate::parsing::loader::LoadedText;
use crate::parsing::naming::{image_file_name, page_number};

/// A named, paginated text fragment produced by the OCR stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// File name, unique within the run
    pub id: FragmentId,

    /// Location the fragment was loaded from
    pub path: PathBuf,

    /// Which pool this fragment belongs to
    pub role: Role,

    /// Text as read from disk, trimmed
    #[serde(skip)]
    pub raw_text: String,

    /// Normalized text used for scoring and reconstruction
    pub text: String,

    /// Language detected on the raw text
    pub language: Language,

    /// Zero-padded page number taken from the name (`000` when absent)
    pub page: String,
}

impl Fragment {
    /// Build a fragment from text already read from `path`.
    #[must_use]
    pub fn from_raw(path: &Path, role: Role, raw: &str) -> Self {
        let raw_text = raw.trim().to_string();
        let LoadedText { text, language } = LoadedText::from_raw(&raw_text);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            page: page_number(&name),
            id: FragmentId::new(name),
            path: path.to_path_buf(),
            role,
            raw_text,
            text,
            language,
        }
    }

    /// A fragment whose file could not be read: empty text, unknown language
    #[must_use]
    pub fn unreadable(path: &Path, role: Role) -> Self {
        Self::from_raw(path, role, "")
    }

    /// Whether the fragment has any text left after normalization
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Name of the companion page image (same stem, `extension`)
    #[must_use]
    pub fn image_name(&self, extension: &str) -> String {
        image_file_name(self.id.as_str(), extension)
    }
}

/// A set of fragments sharing one role, kept in name order
#[derive(Debug, Clone)]
pub struct FragmentPool {
    pub role: Role,
    pub fragments: Vec<Fragment>,
}

impl FragmentPool {
    #[must_use]
    pub fn new(role: Role, mut fragments: Vec<Fragment>) -> Self {
        fragments.sort_by(|a, b| a.id.cmp(&b.id));
        Self { role, fragments }
    }

    #[must_use]
    pub fn empty(role: Role) -> Self {
        Self {
            role,
            fragments: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Look up a fragment by its identity
    #[must_use]
    pub fn get(&self, id: &FragmentId) -> Option<&Fragment> {
        self.fragments.iter().find(|f| &f.id == id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<FragmentId> {
        self.fragments.iter().map(|f| f.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a FragmentPool {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
