//! Run-folder orchestration.
//!
//! A run folder holds the OCR output of one newspaper issue. The association
//! stage loads the head pool from `incomplets/` and the tail pool from
//! `ocr_text/`, matches them, reconstructs matched pairs under
//! `complete_articles/` and writes `associations/association_report.csv`.

pub mod association;

pub use association::{associate_run, AssociationConfig, RunSummary};
