use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::fragment::FragmentPool;
use crate::core::layout::RunLayout;
use crate::core::types::Role;
use crate::matching::engine::{match_pools, Assignment, MatchingConfig};
use crate::matching::oracle::CompatibilityOracle;
use crate::output::report::{build_records, write_report, AssociationRecord};
use crate::output::writer::{ReconstructionOutcome, ReconstructionWriter};
use crate::output::OutputError;
use crate::parsing::loader::load_pool;
use crate::parsing::naming::{article_index, page_number, FragmentNaming};

/// Settings for one association stage
#[derive(Debug, Clone, Default)]
pub struct AssociationConfig {
    pub matching: MatchingConfig,
    pub naming: FragmentNaming,
}

/// What one association stage did
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub heads: usize,
    pub tails: usize,
    pub records: Vec<AssociationRecord>,
    pub reconstructions: Vec<ReconstructionOutcome>,
    /// Report location, absent when the stage was skipped
    pub report_path: Option<PathBuf>,
    /// Why the stage was skipped
    pub skipped: Option<String>,
}

impl RunSummary {
    fn skipped(reason: String) -> Self {
        warn!("Association skipped: {reason}");
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.reconstructions.len()
    }

    #[must_use]
    pub fn unmatched_count(&self) -> usize {
        self.records.len() - self.reconstructions.len()
    }
}

/// Run the association stage over one run folder.
///
/// Skips with a diagnostic, writing nothing, when `ocr_text/` or
/// `incomplets/` is missing or when there is no head at all. With heads but
/// no tails, the report still lists every head as unmatched.
///
/// # Errors
///
/// Returns an `OutputError` when a pool directory cannot be listed, the
/// reconstruction root cannot be created, or the report cannot be written.
/// Failures on individual fragments or pairs are logged and never abort.
pub fn associate_run(
    layout: &RunLayout,
    oracle: &dyn CompatibilityOracle,
    config: &AssociationConfig,
) -> Result<RunSummary, OutputError> {
    let ocr_dir = layout.ocr_text_dir();
    let incomplete_dir = layout.incomplete_dir();
    for dir in [&ocr_dir, &incomplete_dir] {
        if !dir.is_dir() {
            return Ok(RunSummary::skipped(format!(
                "directory not found: {}",
                dir.display()
            )));
        }
    }

    let naming = &config.naming;
    let heads = load_pool(&incomplete_dir, Role::Head, &naming.head_token)?;
    let tails = load_pool(&ocr_dir, Role::Tail, &naming.tail_token)?;
    if heads.is_empty() {
        return Ok(RunSummary::skipped(format!(
            "no {} fragments in {}",
            naming.head_token,
            incomplete_dir.display()
        )));
    }
    if tails.is_empty() {
        warn!(
            "No {} fragments in {}, every head stays unmatched",
            naming.tail_token,
            ocr_dir.display()
        );
    }

    let (_, assignment) = match_pools(&heads, &tails, oracle, &config.matching);

    let destination = layout.complete_articles_dir();
    std::fs::create_dir_all(&destination)?;
    let writer = ReconstructionWriter::new(destination, layout.segment_dir(), naming.clone());
    let reconstructions = reconstruct(&writer, &assignment, &heads, &tails, naming);

    let records = build_records(&assignment);
    let report_path = layout.report_path();
    write_report(&records, &report_path)?;

    info!(
        "{} matched, {} unmatched out of {} head(s)",
        assignment.matched.len(),
        assignment.unmatched.len(),
        heads.len()
    );

    Ok(RunSummary {
        heads: heads.len(),
        tails: tails.len(),
        records,
        reconstructions,
        report_path: Some(report_path),
        skipped: None,
    })
}

fn reconstruct(
    writer: &ReconstructionWriter,
    assignment: &Assignment,
    heads: &FragmentPool,
    tails: &FragmentPool,
    naming: &FragmentNaming,
) -> Vec<ReconstructionOutcome> {
    assignment
        .matched
        .iter()
        .filter_map(|pair| {
            let head = heads.get(&pair.head)?;
            let tail = tails.get(&pair.tail)?;
            let page = page_number(head.id.as_str());
            let index = article_index(head.id.as_str(), &naming.head_token);
            Some(writer.combine(head, tail, &page, &index))
        })
        .collect()
}
