use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::core::layout::RunLayout;
use crate::core::types::Language;
use crate::detection::reference::extract_reference;
use crate::output::OutputError;
use crate::parsing::naming::{file_stem, has_role_token, image_file_name, FragmentNaming};

/// Date used when the run folder name carries none
pub const DEFAULT_DATE: &str = "1900-01-01";
/// Source group every exported article belongs to
pub const SOURCE_GROUP: &str = "ANNONCES";

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"))
}

fn page_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_page_(\d+)").expect("valid page regex"))
}

/// Metadata derived from a run folder named `"<journal> - <lang> - <YYYY-MM-DD>"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub journal: String,
    pub language: Language,
    pub date: String,
}

impl RunMetadata {
    #[must_use]
    pub fn from_folder_name(name: &str) -> Self {
        let journal = name.split(" - ").next().unwrap_or_default().trim().to_string();
        let language = if name.contains("- ar -") {
            Language::Arabic
        } else if name.contains("- fr -") {
            Language::French
        } else {
            Language::Unknown
        };
        let date = date_pattern()
            .find(name)
            .map_or_else(|| DEFAULT_DATE.to_string(), |m| m.as_str().to_string());

        Self {
            journal,
            language,
            date,
        }
    }

    /// Midnight UTC of the run date in RFC 3339, falling back to the default date
    #[must_use]
    pub fn published_at(&self) -> String {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .or_else(|| NaiveDate::parse_from_str(DEFAULT_DATE, "%Y-%m-%d").ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().to_rfc3339())
            .unwrap_or_default()
    }

    fn title(&self, reference: Option<&str>) -> String {
        let base = format!("{} - {} - {}", self.journal, self.language, self.date);
        match reference {
            Some(r) => format!("{base} - {r}"),
            None => base,
        }
    }
}

/// Image(s) attached to an exported article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleFiles {
    /// Every image of a reconstructed article folder
    Many(Vec<String>),
    /// The single segment image of a standalone article
    One(String),
}

/// One article as handed to the downstream classifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedArticle {
    #[serde(rename = "doc_id")]
    pub doc_id: String,
    pub title: String,
    pub reference: Option<String>,
    pub lang: Language,
    pub article_text: String,
    pub published_at: String,
    pub file: ArticleFiles,
    pub source: String,
    #[serde(rename = "source_grps")]
    pub source_grps: Vec<String>,
    pub categories: Vec<String>,
    pub page: Option<u32>,
    pub extras: Option<serde_json::Value>,
}

impl ExportedArticle {
    fn new(meta: &RunMetadata, content: String, file: ArticleFiles, name: &str) -> Self {
        let reference = extract_reference(&content);
        Self {
            doc_id: meta.date.clone(),
            title: meta.title(reference.as_deref()),
            reference,
            lang: meta.language,
            article_text: content,
            published_at: meta.published_at(),
            file,
            source: meta.journal.clone(),
            source_grps: vec![SOURCE_GROUP.to_string()],
            categories: Vec::new(),
            page: page_from_name(name),
            extras: None,
        }
    }
}

fn page_from_name(name: &str) -> Option<u32> {
    page_pattern()
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn read_content(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sorted_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == extension))
        .collect();
    files.sort();
    files
}

/// Reconstructed articles: every text under the reconstruction root that has
/// at least one image beside it
fn collect_complete(layout: &RunLayout, meta: &RunMetadata, naming: &FragmentNaming) -> Vec<ExportedArticle> {
    let mut texts: Vec<PathBuf> = WalkDir::new(layout.complete_articles_dir())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().is_some_and(|e| e == "txt"))
        .collect();
    texts.sort();

    let mut articles = Vec::new();
    for path in texts {
        let name = file_name(&path);
        let Some(content) = read_content(&path) else {
            continue;
        };
        if content.is_empty() {
            info!("Skipped (empty): {name}");
            continue;
        }

        let folder = path.parent().unwrap_or(layout.root());
        let images: Vec<String> = sorted_files(folder, &naming.image_extension)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        if images.is_empty() {
            warn!("No image found for: {name}");
            continue;
        }

        info!("Complete article added: {name}");
        articles.push(ExportedArticle::new(meta, content, ArticleFiles::Many(images), &name));
    }
    articles
}

/// Standalone OCR articles: not tails, not incomplete heads, non-empty, ending
/// with a reference, with an image in the OCR or segment directory
fn collect_standalone(layout: &RunLayout, meta: &RunMetadata, naming: &FragmentNaming) -> Vec<ExportedArticle> {
    let incomplete: HashSet<String> = sorted_files(&layout.incomplete_dir(), "txt")
        .iter()
        .map(|p| file_name(p))
        .filter(|n| has_role_token(n, &naming.head_token))
        .collect();

    let ocr_dir = layout.ocr_text_dir();
    let mut articles = Vec::new();
    for path in sorted_files(&ocr_dir, "txt") {
        let name = file_name(&path);
        if name.contains(&naming.combined_token) || name.contains(&naming.tail_token) {
            continue;
        }
        if name.contains(&naming.head_token) && incomplete.contains(&name) {
            info!("Skipped: {name} is an incomplete head");
            continue;
        }

        let Some(content) = read_content(&path) else {
            continue;
        };
        if content.is_empty() {
            info!("Skipped empty OCR text: {name}");
            continue;
        }
        if extract_reference(&content).is_none() {
            info!("Skipped OCR text without reference: {name}");
            continue;
        }

        let image_name = image_file_name(&name, &naming.image_extension);
        let image = [ocr_dir.join(&image_name), layout.segment_dir().join(&image_name)]
            .into_iter()
            .find(|p| p.is_file());
        let Some(image) = image else {
            info!("Skipped OCR text without image: {}", file_stem(&name));
            continue;
        };

        info!("OCR article added: {name}");
        articles.push(ExportedArticle::new(
            meta,
            content,
            ArticleFiles::One(image.display().to_string()),
            &name,
        ));
    }
    articles
}

/// Gather reconstructed and standalone articles of a run
#[must_use]
pub fn collect_articles(layout: &RunLayout, naming: &FragmentNaming) -> Vec<ExportedArticle> {
    let meta = RunMetadata::from_folder_name(&layout.folder_name());
    info!(
        "Exporting articles for {} ({}) - {}",
        meta.journal, meta.language, meta.date
    );

    let mut articles = collect_complete(layout, &meta, naming);
    articles.extend(collect_standalone(layout, &meta, naming));
    articles
}

/// Write `articles` as a pretty-printed JSON array (4-space indent)
///
/// # Errors
///
/// Returns `OutputError::Io` or `OutputError::Json` if writing fails.
pub fn write_articles(articles: &[ExportedArticle], path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    articles.serialize(&mut serializer)?;
    std::fs::write(path, buffer)?;

    info!("{} article(s) exported to {}", articles.len(), path.display());
    Ok(())
}

/// Collect and write the run's articles to `output` (default `articles_final.json`)
///
/// # Errors
///
/// Returns an `OutputError` if the JSON file cannot be written.
pub fn export_articles(
    layout: &RunLayout,
    naming: &FragmentNaming,
    output: Option<&Path>,
) -> Result<Vec<ExportedArticle>, OutputError> {
    let articles = collect_articles(layout, naming);
    let path = output.map_or_else(|| layout.export_path(), Path::to_path_buf);
    write_articles(&articles, &path)?;
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_metadata_from_folder_name() {
        let meta = RunMetadata::from_folder_name("JrSahafa - ar - 2025-08-04");
        assert_eq!(meta.journal, "JrSahafa");
        assert_eq!(meta.language, Language::Arabic);
        assert_eq!(meta.date, "2025-08-04");
        assert_eq!(meta.published_at(), "2025-08-04T00:00:00+00:00");

        let other = RunMetadata::from_folder_name("loose");
        assert_eq!(other.journal, "loose");
        assert_eq!(other.language, Language::Unknown);
        assert_eq!(other.date, DEFAULT_DATE);
        assert_eq!(other.published_at(), "1900-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_title_includes_reference() {
        let meta = RunMetadata::from_folder_name("Daily - fr - 2024-01-02");
        assert_eq!(meta.title(Some("12345A")), "Daily - fr - 2024-01-02 - 12345A");
        assert_eq!(meta.title(None), "Daily - fr - 2024-01-02");
    }

    #[test]
    fn test_article_json_field_names() {
        let meta = RunMetadata::from_folder_name("Daily - fr - 2024-01-02");
        let article = ExportedArticle::new(
            &meta,
            "Avis\nRef 12345".to_string(),
            ArticleFiles::One("img.png".to_string()),
            "Daily_page_3_article_02_1.txt",
        );
        let value = serde_json::to_value(&article).unwrap();

        assert_eq!(value["doc_id"], "2024-01-02");
        assert_eq!(value["articleText"], "Avis\nRef 12345");
        assert_eq!(value["publishedAt"], "2024-01-02T00:00:00+00:00");
        assert_eq!(value["source_grps"][0], "ANNONCES");
        assert_eq!(value["lang"], "fr");
        assert_eq!(value["file"], "img.png");
        assert_eq!(value["page"], 3);
        assert_eq!(value["reference"], "12345");
        assert!(value["extras"].is_null());
    }

    #[test]
    fn test_export_articles() {
        let tmp = TempDir::new().unwrap();
        let layout = RunLayout::new(tmp.path().join("Daily - fr - 2024-01-02"));
        let naming = FragmentNaming::default();

        // Reconstructed article with one image
        let folder = layout.complete_articles_dir().join("article_complet_1");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("D_page_1_article_complet_1.txt"), "head\n\ntail\nRef 44556").unwrap();
        std::fs::write(folder.join("D_page_1_article_00_1.png"), b"img").unwrap();

        // Reconstructed article without any image is skipped
        let bare = layout.complete_articles_dir().join("article_complet_2");
        std::fs::create_dir_all(&bare).unwrap();
        std::fs::write(bare.join("D_page_1_article_complet_2.txt"), "no image").unwrap();

        let ocr = layout.ocr_text_dir();
        std::fs::create_dir_all(&ocr).unwrap();
        std::fs::create_dir_all(layout.segment_dir()).unwrap();
        std::fs::create_dir_all(layout.incomplete_dir()).unwrap();
        // Standalone complete head with image in segment
        std::fs::write(ocr.join("D_page_2_article_00_1.txt"), "Avis\nRef 99887").unwrap();
        std::fs::write(layout.segment_dir().join("D_page_2_article_00_1.png"), b"img").unwrap();
        // Incomplete head is skipped
        std::fs::write(ocr.join("D_page_2_article_00_2.txt"), "coupé\nRef 11223").unwrap();
        std::fs::write(layout.incomplete_dir().join("D_page_2_article_00_2.txt"), "coupé").unwrap();
        // Tails are skipped
        std::fs::write(ocr.join("D_page_3_article_01_1.txt"), "suite\nRef 33445").unwrap();
        // No reference is skipped
        std::fs::write(ocr.join("D_page_4_article_00_1.txt"), "texte libre").unwrap();
        std::fs::write(ocr.join("D_page_4_article_00_1.png"), b"img").unwrap();

        let articles = export_articles(&layout, &naming, None).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].reference.as_deref(), Some("44556"));
        assert!(matches!(&articles[0].file, ArticleFiles::Many(files) if files.len() == 1));
        assert_eq!(articles[1].page, Some(2));
        assert!(matches!(&articles[1].file, ArticleFiles::One(f) if f.ends_with("D_page_2_article_00_1.png")));

        let written = std::fs::read_to_string(layout.export_path()).unwrap();
        let parsed: Vec<ExportedArticle> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, articles);
        assert!(written.contains("\n    {"));
    }
}
