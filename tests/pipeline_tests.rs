//! End-to-end tests of the association stage over scratch run folders
//!
//! Each test lays out `ocr_text/`, `incomplets/` and `segment/` in a temporary
//! directory, runs detection and association with a stub oracle, and checks
//! the report, the reconstructed articles and the export.

use std::path::Path;

use article_joiner::core::layout::RunLayout;
use article_joiner::detection::incomplete::detect_incomplete;
use article_joiner::matching::oracle::{LookupOracle, TextPair};
use article_joiner::output::export::export_articles;
use article_joiner::output::report::read_report;
use article_joiner::parsing::naming::FragmentNaming;
use article_joiner::pipeline::{associate_run, AssociationConfig};
use article_joiner::{CompatibilityOracle, MatchStatus};
use tempfile::TempDir;

const H1: &str = "J_page_1_article_00_1.txt";
const H2: &str = "J_page_1_article_00_2.txt";
const T1: &str = "J_page_2_article_01_1.txt";
const T2: &str = "J_page_2_article_01_2.txt";

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), text).unwrap();
}

/// Run folder with `heads` in both `ocr_text/` and `incomplets/` and `tails` in `ocr_text/`
fn run_folder(tmp: &TempDir, heads: &[(&str, &str)], tails: &[(&str, &str)]) -> RunLayout {
    let layout = RunLayout::new(tmp.path().join("Daily - fr - 2024-01-02"));
    std::fs::create_dir_all(layout.ocr_text_dir()).unwrap();
    std::fs::create_dir_all(layout.incomplete_dir()).unwrap();
    for (name, text) in heads {
        write(&layout.ocr_text_dir(), name, text);
        write(&layout.incomplete_dir(), name, text);
    }
    for (name, text) in tails {
        write(&layout.ocr_text_dir(), name, text);
    }
    layout
}

fn two_by_two_oracle() -> LookupOracle {
    LookupOracle::new()
        .with_score(H1, T1, 0.9)
        .with_score(H1, T2, 0.2)
        .with_score(H2, T1, 0.8)
        .with_score(H2, T2, 0.95)
}

#[test]
fn test_global_maximum_is_selected_first() {
    let tmp = TempDir::new().unwrap();
    let layout = run_folder(
        &tmp,
        &[(H1, "Vente d un terrain situé"), (H2, "Location appartement")],
        &[(T1, "à Casablanca Ref 12345"), (T2, "meublé centre ville Ref 67890")],
    );

    let summary = associate_run(&layout, &two_by_two_oracle(), &AssociationConfig::default()).unwrap();

    let pairs: Vec<(&str, &str)> = summary
        .reconstructions
        .iter()
        .map(|o| (o.head.as_str(), o.tail.as_str()))
        .collect();
    assert_eq!(pairs, vec![(H2, T2), (H1, T1)]);

    let records = read_report(&layout.report_path()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.status == MatchStatus::Matched));
    assert_eq!(records[0].similarity.as_deref(), Some("0.9500"));
    assert_eq!(records[1].similarity.as_deref(), Some("0.9000"));
}

#[test]
fn test_head_without_tails_is_unmatched() {
    let tmp = TempDir::new().unwrap();
    let layout = run_folder(&tmp, &[(H1, "Vente d un terrain situé")], &[]);
    let oracle = |_: &str, _: &str| 1.0;

    associate_run(&layout, &oracle, &AssociationConfig::default()).unwrap();

    let records = read_report(&layout.report_path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].article_00.as_str(), H1);
    assert_eq!(records[0].article_01, None);
    assert_eq!(records[0].similarity, None);
    assert_eq!(records[0].status, MatchStatus::Unmatched);
}

#[test]
fn test_empty_texts_are_never_paired() {
    let tmp = TempDir::new().unwrap();
    let layout = run_folder(&tmp, &[(H1, "   ")], &[(T1, "|||")]);
    let oracle = |_: &str, _: &str| 1.0;

    let summary = associate_run(&layout, &oracle, &AssociationConfig::default()).unwrap();

    assert_eq!(summary.matched_count(), 0);
    let records = read_report(&layout.report_path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, MatchStatus::Unmatched);
}

#[test]
fn test_every_head_reported_once() {
    let tmp = TempDir::new().unwrap();
    let heads: Vec<(String, String)> = (1..=5)
        .map(|i| (format!("J_page_1_article_00_{i}.txt"), format!("début numéro {i}")))
        .collect();
    let tails: Vec<(String, String)> = (1..=3)
        .map(|i| (format!("J_page_2_article_01_{i}.txt"), format!("suite numéro {i}")))
        .collect();
    let head_refs: Vec<(&str, &str)> = heads.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
    let tail_refs: Vec<(&str, &str)> = tails.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
    let layout = run_folder(&tmp, &head_refs, &tail_refs);

    let summary = associate_run(
        &layout,
        &article_joiner::matching::oracle::LexicalOracle::default(),
        &AssociationConfig::default(),
    )
    .unwrap();

    let records = read_report(&layout.report_path()).unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(summary.matched_count(), 3);

    let mut heads_seen: Vec<&str> = records.iter().map(|r| r.article_00.as_str()).collect();
    heads_seen.sort_unstable();
    heads_seen.dedup();
    assert_eq!(heads_seen.len(), 5);

    let mut tails_used: Vec<&str> = records
        .iter()
        .filter_map(|r| r.article_01.as_ref().map(|t| t.as_str()))
        .collect();
    tails_used.sort_unstable();
    tails_used.dedup();
    assert_eq!(tails_used.len(), 3);
}

#[test]
fn test_rerun_overwrites_outputs() {
    let tmp = TempDir::new().unwrap();
    let layout = run_folder(
        &tmp,
        &[(H1, "Vente d un terrain situé")],
        &[(T1, "à Casablanca Ref 12345")],
    );
    let oracle = LookupOracle::new().with_score(H1, T1, 0.7);
    let config = AssociationConfig::default();

    let first = associate_run(&layout, &oracle, &config).unwrap();
    let report = std::fs::read_to_string(layout.report_path()).unwrap();
    let second = associate_run(&layout, &oracle, &config).unwrap();

    assert_eq!(std::fs::read_to_string(layout.report_path()).unwrap(), report);
    assert_eq!(first.records, second.records);

    let folder = &second.reconstructions[0].folder;
    let entries = std::fs::read_dir(folder).unwrap().count();
    assert_eq!(entries, 1);
    assert_eq!(
        std::fs::read_to_string(folder.join("J_page_1_article_complet_1.txt")).unwrap(),
        "Vente d un terrain situé\n\nà Casablanca Ref 12345"
    );
}

struct CountingOracle {
    calls: std::cell::Cell<usize>,
}

impl CompatibilityOracle for CountingOracle {
    fn score(
        &self,
        pair: &TextPair<'_>,
    ) -> Result<f64, article_joiner::matching::oracle::OracleError> {
        self.calls.set(self.calls.get() + 1);
        assert!(pair.head_text.chars().count() <= 10);
        Ok(0.5)
    }
}

#[test]
fn test_oracle_sees_truncated_texts_once_per_pair() {
    let tmp = TempDir::new().unwrap();
    let long = "mot ".repeat(100);
    let long = long.as_str();
    let layout = run_folder(&tmp, &[(H1, long), (H2, long)], &[(T1, long), (T2, long)]);
    let oracle = CountingOracle {
        calls: std::cell::Cell::new(0),
    };
    let mut config = AssociationConfig::default();
    config.matching.max_chars = 10;

    let summary = associate_run(&layout, &oracle, &config).unwrap();

    assert_eq!(oracle.calls.get(), 4);
    assert_eq!(summary.matched_count(), 2);
}

#[test]
fn test_detect_associate_export() {
    let tmp = TempDir::new().unwrap();
    let layout = RunLayout::new(tmp.path().join("Daily - fr - 2024-01-02"));
    let ocr = layout.ocr_text_dir();
    let segment = layout.segment_dir();
    write(&ocr, "D_page_1_article_00_1.txt", "Vente d un terrain situé");
    write(&ocr, "D_page_1_article_00_2.txt", "Avis de constitution\nRef 55667");
    write(&ocr, "D_page_2_article_01_1.txt", "à Casablanca\nRef 12345");
    write(&segment, "D_page_1_article_00_1.png", "img");
    write(&segment, "D_page_1_article_00_2.png", "img");
    write(&segment, "D_page_2_article_01_1.png", "img");

    let naming = FragmentNaming::default();
    let detection = detect_incomplete(&layout, &naming.head_token).unwrap();
    assert_eq!(detection.incomplete, vec!["D_page_1_article_00_1.txt"]);

    let oracle = |_: &str, _: &str| 0.6;
    let summary = associate_run(&layout, &oracle, &AssociationConfig::default()).unwrap();
    assert_eq!(summary.matched_count(), 1);
    assert_eq!(summary.reconstructions[0].images_copied, 2);

    let articles = export_articles(&layout, &naming, None).unwrap();
    let references: Vec<Option<&str>> = articles.iter().map(|a| a.reference.as_deref()).collect();
    assert_eq!(references, vec![Some("12345"), Some("55667")]);
    assert!(layout.export_path().is_file());
}
