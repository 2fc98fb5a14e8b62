//! Head/tail pairing: compatibility scoring and greedy assignment.
//!
//! This module provides the core matching functionality:
//!
//! - [`CompatibilityOracle`]: Scores how likely a tail continues a head
//! - [`ScoreMatrix`]: Complete pairwise scores for one run
//! - [`AssignmentEngine`]: Greedy one-to-one selection over the matrix
//!
//! ## Matching Algorithm
//!
//! 1. **Score**: every (head, tail) pair with non-empty text on both sides is
//!    scored once; texts are bounded to `max_chars` characters
//! 2. **Select**: up to `min(|heads|, |tails|)` rounds, each taking the highest
//!    remaining score (ties: first head, then first tail)
//! 3. **Consume**: the selected head and tail leave the candidate set for good
//! 4. **Report**: heads never selected are unmatched
//!
//! Greedy, not an optimal assignment: the best
//! pair in the whole matrix is always kept.
//!
//! ## Example
//!
//! ```rust
//! use article_joiner::core::types::FragmentId;
//! use article_joiner::matching::engine::AssignmentEngine;
//! use article_joiner::matching::scoring::ScoreMatrix;
//!
//! let mut matrix = ScoreMatrix::new(
//!     vec![FragmentId::new("H1"), FragmentId::new("H2")],
//!     vec![FragmentId::new("T1"), FragmentId::new("T2")],
//! );
//! matrix.set(0, 0, 0.9);
//! matrix.set(0, 1, 0.2);
//! matrix.set(1, 0, 0.8);
//! matrix.set(1, 1, 0.95);
//!
//! let assignment = AssignmentEngine::new(&matrix).assign();
//! assert_eq!(assignment.matched[0].head.as_str(), "H2");
//! assert_eq!(assignment.matched[1].tail.as_str(), "T1");
//! ```
//!
//! [`CompatibilityOracle`]: oracle::CompatibilityOracle
//! [`ScoreMatrix`]: scoring::ScoreMatrix
//! [`AssignmentEngine`]: engine::AssignmentEngine

pub mod engine;
pub mod oracle;
pub mod scoring;
