use serde::Serialize;
use tracing::info;

use crate::core::fragment::FragmentPool;
use crate::core::types::FragmentId;
use crate::matching::oracle::CompatibilityOracle;
use crate::matching::scoring::ScoreMatrix;

/// Default bound on the characters of each side handed to the oracle
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Configuration for the matching engine
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Maximum characters of each text passed to the oracle
    pub max_chars: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// One selected (head, tail) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub head: FragmentId,
    pub tail: FragmentId,
    pub score: f64,
}

/// Result of greedy matching: selected pairs in selection order plus the
/// heads that were never selected, in head order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assignment {
    pub matched: Vec<MatchedPair>,
    pub unmatched: Vec<FragmentId>,
}

impl Assignment {
    /// Tail paired with `head`, if any
    #[must_use]
    pub fn tail_for(&self, head: &FragmentId) -> Option<&MatchedPair> {
        self.matched.iter().find(|m| &m.head == head)
    }

    /// Every head accounted for: matched plus unmatched
    #[must_use]
    pub fn head_count(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }
}

/// Global greedy one-to-one matcher over a complete score matrix.
///
/// Each round scans every unmatched head and every unused tail and takes the
/// single highest-scoring pair. Comparisons are strictly greater-than, so ties
/// go to the first pair in head-then-tail order. Selected heads and tails are
/// never reconsidered.
pub struct AssignmentEngine<'a> {
    matrix: &'a ScoreMatrix,
}

impl<'a> AssignmentEngine<'a> {
    #[must_use]
    pub fn new(matrix: &'a ScoreMatrix) -> Self {
        Self { matrix }
    }

    /// Run the greedy selection
    #[must_use]
    pub fn assign(&self) -> Assignment {
        let head_count = self.matrix.head_count();
        let tail_count = self.matrix.tail_count();

        let mut head_used = vec![false; head_count];
        let mut tail_used = vec![false; tail_count];
        let mut matched = Vec::new();

        for _ in 0..head_count.min(tail_count) {
            let Some((hi, ti, score)) = self.best_remaining(&head_used, &tail_used) else {
                break;
            };

            let pair = MatchedPair {
                head: self.matrix.heads()[hi].clone(),
                tail: self.matrix.tails()[ti].clone(),
                score,
            };
            info!("Matched {} <> {} ({score:.4})", pair.head, pair.tail);

            head_used[hi] = true;
            tail_used[ti] = true;
            matched.push(pair);
        }

        let unmatched = self
            .matrix
            .heads()
            .iter()
            .zip(&head_used)
            .filter(|(_, used)| !**used)
            .map(|(id, _)| id.clone())
            .collect();

        Assignment { matched, unmatched }
    }

    /// Highest remaining entry; the threshold starts below any valid score so a
    /// lone 0.0 entry is still selectable
    fn best_remaining(&self, head_used: &[bool], tail_used: &[bool]) -> Option<(usize, usize, f64)> {
        let mut max_score = -1.0;
        let mut best = None;

        for (hi, _) in head_used.iter().enumerate().filter(|(_, used)| !**used) {
            for (ti, entry) in self.matrix.row(hi).iter().enumerate() {
                let Some(score) = *entry else {
                    continue;
                };
                if tail_used[ti] {
                    continue;
                }
                if score > max_score {
                    max_score = score;
                    best = Some((hi, ti, score));
                }
            }
        }

        best
    }
}

/// Score both pools with `oracle` and match them
pub fn match_pools(
    heads: &FragmentPool,
    tails: &FragmentPool,
    oracle: &dyn CompatibilityOracle,
    config: &MatchingConfig,
) -> (ScoreMatrix, Assignment) {
    let matrix = ScoreMatrix::compute(heads, tails, oracle, config.max_chars);
    let assignment = AssignmentEngine::new(&matrix).assign();
    (matrix, assignment)
}
