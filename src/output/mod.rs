//! Artifacts produced by an association run.
//!
//! - [`writer`]: Combined article text plus copied page images, one folder per pair
//! - [`report`]: The `association_report.csv` audit table, one row per head
//! - [`export`]: `articles_final.json`, the article list handed to classifiers
//!
//! The audit table is the single record of what succeeded: every head that
//! existed at the start of the run appears in it exactly once.

use thiserror::Error;

use crate::parsing::loader::LoadError;
use crate::utils::validation::ValidationError;

pub mod export;
pub mod report;
pub mod writer;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid fragment name: {0}")]
    InvalidName(#[from] ValidationError),

    #[error("Failed to load fragments: {0}")]
    Load(#[from] LoadError),
}
