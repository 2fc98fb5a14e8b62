//! Loading and normalizing OCR fragments.
//!
//! This module provides:
//!
//! - **Fragment loading**: Read a fragment file, never failing on unreadable input
//! - **Normalization**: NFKC composition, symbol stripping and whitespace collapsing
//! - **Language tags**: Advisory `ar`/`fr`/`en` detection on raw text
//! - **Naming**: Page numbers, article indexes and derived output names
//! - **Score tables**: Precomputed head/tail scores for replay
//!
//! ## Example
//!
//! ```rust,no_run
//! use article_joiner::core::types::Role;
//! use article_joiner::parsing::loader::load_pool;
//! use std::path::Path;
//!
//! let heads = load_pool(Path::new("run/incomplets"), Role::Head, "article_00").unwrap();
//! for fragment in &heads {
//!     println!("{} (page {}): {} chars", fragment.id, fragment.page, fragment.text.len());
//! }
//! ```

pub mod language;
pub mod loader;
pub mod naming;
pub mod normalize;
pub mod scores;
