use tracing::debug;

use crate::core::fragment::FragmentPool;
use crate::core::types::FragmentId;
use crate::matching::oracle::{score_or_zero, CompatibilityOracle, TextPair};
use crate::utils::validation::truncate_chars;

/// Pairwise compatibility scores between every head and every tail.
///
/// Rows follow head order and columns follow tail order. The matrix is sparse:
/// a pair whose head or tail has no normalized text is never scored and has no
/// entry, so it can never be selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    heads: Vec<FragmentId>,
    tails: Vec<FragmentId>,
    scores: Vec<Vec<Option<f64>>>,
}

impl ScoreMatrix {
    /// An empty matrix over the given identities, with no entries
    #[must_use]
    pub fn new(heads: Vec<FragmentId>, tails: Vec<FragmentId>) -> Self {
        let scores = vec![vec![None; tails.len()]; heads.len()];
        Self {
            heads,
            tails,
            scores,
        }
    }

    /// Score every pair with non-empty text on both sides.
    ///
    /// Texts are cut to `max_chars` characters before they reach the oracle.
    /// The whole matrix is filled before any selection happens.
    pub fn compute(
        heads: &FragmentPool,
        tails: &FragmentPool,
        oracle: &dyn CompatibilityOracle,
        max_chars: usize,
    ) -> Self {
        let mut matrix = Self::new(heads.ids(), tails.ids());

        let tail_texts: Vec<&str> = tails
            .iter()
            .map(|t| truncate_chars(&t.text, max_chars))
            .collect();

        for (hi, head) in heads.iter().enumerate() {
            let head_text = truncate_chars(&head.text, max_chars);
            if head_text.is_empty() {
                continue;
            }
            for (ti, tail) in tails.iter().enumerate() {
                let tail_text = tail_texts[ti];
                if tail_text.is_empty() {
                    continue;
                }
                let pair = TextPair {
                    head_id: &head.id,
                    tail_id: &tail.id,
                    head_text,
                    tail_text,
                };
                let score = score_or_zero(oracle, &pair);
                debug!("Sim {} <> {}: {score:.4}", head.id, tail.id);
                matrix.scores[hi][ti] = Some(score);
            }
        }

        matrix
    }

    /// Set the score of a pair by position
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn set(&mut self, head: usize, tail: usize, score: f64) {
        self.scores[head][tail] = Some(score);
    }

    /// Set the score of a pair by identity; returns false if either is unknown
    pub fn set_by_id(&mut self, head: &FragmentId, tail: &FragmentId, score: f64) -> bool {
        let hi = self.heads.iter().position(|h| h == head);
        let ti = self.tails.iter().position(|t| t == tail);
        match (hi, ti) {
            (Some(hi), Some(ti)) => {
                self.scores[hi][ti] = Some(score);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, head: usize, tail: usize) -> Option<f64> {
        self.scores.get(head)?.get(tail).copied().flatten()
    }

    /// Scores of one head against each tail, in tail order
    #[must_use]
    pub fn row(&self, head: usize) -> &[Option<f64>] {
        self.scores.get(head).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn heads(&self) -> &[FragmentId] {
        &self.heads
    }

    #[must_use]
    pub fn tails(&self) -> &[FragmentId] {
        &self.tails
    }

    #[must_use]
    pub fn head_count(&self) -> usize {
        self.heads.len()
    }

    #[must_use]
    pub fn tail_count(&self) -> usize {
        self.tails.len()
    }

    /// Number of scored pairs
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.scores.iter().flatten().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fragment::Fragment;
    use crate::core::types::Role;
    use std::cell::Cell;
    use std::path::Path;

    fn pool(role: Role, items: &[(&str, &str)]) -> FragmentPool {
        FragmentPool::new(
            role,
            items
                .iter()
                .map(|(name, text)| Fragment::from_raw(Path::new(name), role, text))
                .collect(),
        )
    }

    #[test]
    fn test_empty_text_pairs_are_not_scored() {
        let heads = pool(Role::Head, &[("h1", "first head"), ("h2", "   ")]);
        let tails = pool(Role::Tail, &[("t1", "tail text"), ("t2", "")]);
        let calls = Cell::new(0);
        let oracle = |_: &str, _: &str| {
            calls.set(calls.get() + 1);
            0.5
        };

        let matrix = ScoreMatrix::compute(&heads, &tails, &oracle, 1000);
        assert_eq!(matrix.entry_count(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(matrix.get(0, 0), Some(0.5));
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.head_count(), 2);
        assert_eq!(matrix.tail_count(), 2);
    }

    #[test]
    fn test_oracle_sees_truncated_text() {
        let heads = pool(Role::Head, &[("h1", "abcdefghij")]);
        let tails = pool(Role::Tail, &[("t1", "klmnopqrst")]);
        let oracle = |a: &str, b: &str| {
            assert_eq!(a, "abcd");
            assert_eq!(b, "klmn");
            0.3
        };

        let matrix = ScoreMatrix::compute(&heads, &tails, &oracle, 4);
        assert_eq!(matrix.get(0, 0), Some(0.3));
    }

    #[test]
    fn test_set_by_id() {
        let mut matrix = ScoreMatrix::new(
            vec![FragmentId::new("h1")],
            vec![FragmentId::new("t1"), FragmentId::new("t2")],
        );
        assert!(matrix.set_by_id(&FragmentId::new("h1"), &FragmentId::new("t2"), 0.9));
        assert!(!matrix.set_by_id(&FragmentId::new("h9"), &FragmentId::new("t2"), 0.9));
        assert_eq!(matrix.row(0), &[None, Some(0.9)]);
        assert!(matrix.row(5).is_empty());
    }
}
