//! # article-joiner
//!
//! A library for reassembling newspaper articles that a page-layout detector
//! split across two OCR segments.
//!
//! Classified ads and legal notices close with a reference code. A segment
//! whose text stops before any such code is a *head*: the first half of an
//! article whose continuation, a *tail*, sits elsewhere on the same or a later
//! page. `article-joiner` pairs each head with at most one tail, writes the
//! combined article, and records every decision in an audit table.
//!
//! ## Features
//!
//! - **Incomplete detection**: Trailing reference codes separate finished articles from cut ones
//! - **Pluggable scoring**: Any [`CompatibilityOracle`] (lexical heuristic, score table, external program)
//! - **Greedy assignment**: Highest-scoring pair first, each head and tail used at most once
//! - **Reconstruction**: Combined text and both page images per matched pair
//! - **Audit table**: `association_report.csv`, one row per head
//!
//! ## Example
//!
//! ```rust,no_run
//! use article_joiner::core::layout::RunLayout;
//! use article_joiner::matching::oracle::LexicalOracle;
//! use article_joiner::pipeline::{associate_run, AssociationConfig};
//!
//! let layout = RunLayout::new("Daily - fr - 2024-01-02");
//! let summary = associate_run(&layout, &LexicalOracle::default(), &AssociationConfig::default()).unwrap();
//!
//! for record in &summary.records {
//!     println!("{} -> {:?} ({})", record.article_00, record.article_01, record.status);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Fragments, pools, identifiers and the run-folder layout
//! - [`parsing`]: Fragment loading, text normalization, file naming and score tables
//! - [`matching`]: Compatibility oracles, the score matrix and the greedy engine
//! - [`output`]: Reconstruction writer, association report and JSON export
//! - [`detection`]: Incomplete-article detection
//! - [`pipeline`]: The association stage over a run folder
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod detection;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::fragment::{Fragment, FragmentPool};
pub use crate::core::layout::RunLayout;
pub use crate::core::types::*;
pub use matching::engine::{Assignment, AssignmentEngine};
pub use matching::oracle::CompatibilityOracle;
pub use matching::scoring::ScoreMatrix;
pub use output::report::AssociationRecord;
