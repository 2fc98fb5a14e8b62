use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::core::fragment::Fragment;
use crate::core::types::FragmentId;
use crate::output::OutputError;
use crate::parsing::naming::{combined_file_name, combined_folder_name, FragmentNaming};
use crate::utils::validation::validate_fragment_name;

/// What one reconstruction produced on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructionOutcome {
    pub head: FragmentId,
    pub tail: FragmentId,
    /// Per-pair output folder
    pub folder: PathBuf,
    /// Combined text file, absent if writing it failed
    pub text_file: Option<PathBuf>,
    /// Images copied from the segment archive (0 to 2)
    pub images_copied: usize,
    /// Image names that were absent or could not be copied
    pub images_missing: Vec<String>,
    /// Failure that stopped the reconstruction, if any
    pub error: Option<String>,
}

impl ReconstructionOutcome {
    /// Text written and both images present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.text_file.is_some() && self.images_missing.is_empty()
    }
}

/// Materializes matched pairs as combined articles.
///
/// Each pair gets the folder `<combined_token>_<article_index>` under the
/// destination root, holding the combined text and copies of both page images.
pub struct ReconstructionWriter {
    destination_root: PathBuf,
    image_archive: PathBuf,
    naming: FragmentNaming,
}

impl ReconstructionWriter {
    pub fn new(
        destination_root: impl Into<PathBuf>,
        image_archive: impl Into<PathBuf>,
        naming: FragmentNaming,
    ) -> Self {
        Self {
            destination_root: destination_root.into(),
            image_archive: image_archive.into(),
            naming,
        }
    }

    #[must_use]
    pub fn folder_for(&self, article_index: &str) -> PathBuf {
        self.destination_root
            .join(combined_folder_name(&self.naming.combined_token, article_index))
    }

    /// Combine `head` and `tail` into one article.
    ///
    /// Never fails: errors are logged and recorded in the outcome. Rerunning with
    /// the same pair overwrites the combined text. `page` is only logged, the
    /// folder is keyed by `article_index` alone.
    pub fn combine(
        &self,
        head: &Fragment,
        tail: &Fragment,
        page: &str,
        article_index: &str,
    ) -> ReconstructionOutcome {
        let mut outcome = ReconstructionOutcome {
            head: head.id.clone(),
            tail: tail.id.clone(),
            folder: self.folder_for(article_index),
            text_file: None,
            images_copied: 0,
            images_missing: Vec::new(),
            error: None,
        };

        debug!(
            "Combining {} + {} (page {page}, article {article_index})",
            head.id, tail.id
        );

        if let Err(e) = self.write_into(&mut outcome, head, tail) {
            error!("Failed to combine {} + {}: {e}", head.id, tail.id);
            outcome.error = Some(e.to_string());
        }

        outcome
    }

    fn write_into(
        &self,
        outcome: &mut ReconstructionOutcome,
        head: &Fragment,
        tail: &Fragment,
    ) -> Result<(), OutputError> {
        let head_name = validate_fragment_name(head.id.as_str())?;
        validate_fragment_name(tail.id.as_str())?;

        info!("Head ({}) length: {}", head.id, head.text.chars().count());
        info!("Tail ({}) length: {}", tail.id, tail.text.chars().count());

        std::fs::create_dir_all(&outcome.folder)?;

        let combined = format!("{}\n\n{}", head.text.trim(), tail.text.trim());
        let text_path = outcome.folder.join(combined_file_name(
            head_name,
            &self.naming.head_token,
            &self.naming.combined_token,
        ));
        std::fs::write(&text_path, combined)?;
        outcome.text_file = Some(text_path);

        for fragment in [head, tail] {
            let image_name = fragment.image_name(&self.naming.image_extension);
            if copy_image(&self.image_archive, &outcome.folder, &image_name) {
                outcome.images_copied += 1;
            } else {
                outcome.images_missing.push(image_name);
            }
        }

        info!(
            "Combined article written to {} ({} image(s))",
            outcome.folder.display(),
            outcome.images_copied
        );
        Ok(())
    }
}

/// Copy `name` from `archive` into `folder`; missing or failed copies are warnings
fn copy_image(archive: &Path, folder: &Path, name: &str) -> bool {
    let source = archive.join(name);
    if !source.is_file() {
        warn!("Missing image: {}", source.display());
        return false;
    }

    match std::fs::copy(&source, folder.join(name)) {
        Ok(_) => true,
        Err(e) => {
            warn!("Failed to copy image {}: {e}", source.display());
            false
        }
    }
}
