//! Core data types for article reconstruction.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Fragment`]: A named, paginated OCR text segment with its normalized text
//! - [`FragmentPool`]: The heads or the tails of one run, in name order
//! - [`FragmentId`], [`Role`], [`MatchStatus`], [`Language`]: Identity and classification types
//! - [`RunLayout`]: Sub-directories of a pipeline run folder
//!
//! ## Fragment Naming
//!
//! Fragment file names carry the page and the position of the segment on the page:
//!
//! | Part            | Example             | Meaning                          |
//! |-----------------|---------------------|----------------------------------|
//! | `_page_N_`      | `_page_12_`         | Page number, reported as `012`   |
//! | `article_00_K`  | `article_00_3.txt`  | Head role token, article index 3 |
//! | `article_01_K`  | `article_01_5.txt`  | Tail role token                  |
//!
//! [`Fragment`]: fragment::Fragment
//! [`FragmentPool`]: fragment::FragmentPool
//! [`FragmentId`]: types::FragmentId
//! [`Role`]: types::Role
//! [`MatchStatus`]: types::MatchStatus
//! [`Language`]: types::Language
//! [`RunLayout`]: layout::RunLayout

pub mod fragment;
pub mod layout;
pub mod types;
