//! Compatibility oracles: how likely a tail continues a head.
//!
//! The engine only sees [`CompatibilityOracle`]. Implementations here cover a
//! deterministic lexical heuristic, a fixed lookup table (for stubs and for
//! replaying scores computed elsewhere) and an external scoring program.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::error;

use crate::core::types::FragmentId;
use crate::parsing::loader::LoadError;
use crate::parsing::scores::{parse_score_file, ScoreEntry};
use crate::utils::validation::count_to_f64;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scoring command failed: {0}")]
    Command(String),

    #[error("Invalid oracle output: {0}")]
    InvalidOutput(String),
}

/// The two sides of one candidate pairing, as handed to an oracle
#[derive(Debug, Clone, Copy)]
pub struct TextPair<'a> {
    pub head_id: &'a FragmentId,
    pub tail_id: &'a FragmentId,
    pub head_text: &'a str,
    pub tail_text: &'a str,
}

/// Scores how likely `tail_text` directly continues `head_text`.
///
/// Implementations must be deterministic for identical inputs within one run.
/// Results are expected in [0, 1]; callers go through [`score_or_zero`], which
/// enforces the range and turns failures into 0.0.
pub trait CompatibilityOracle {
    /// # Errors
    ///
    /// Returns an `OracleError` when the score cannot be computed.
    fn score(&self, pair: &TextPair<'_>) -> Result<f64, OracleError>;
}

/// Plain functions and closures over the two texts act as oracles
impl<F> CompatibilityOracle for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, pair: &TextPair<'_>) -> Result<f64, OracleError> {
        Ok(self(pair.head_text, pair.tail_text))
    }
}

/// Score a pair, never failing.
///
/// Empty text on either side is 0.0 without consulting the oracle. Errors and
/// non-finite results degrade to 0.0; other values are clamped to [0, 1].
pub fn score_or_zero(oracle: &dyn CompatibilityOracle, pair: &TextPair<'_>) -> f64 {
    if pair.head_text.is_empty() || pair.tail_text.is_empty() {
        return 0.0;
    }

    match oracle.score(pair) {
        Ok(score) if score.is_finite() => score.clamp(0.0, 1.0),
        Ok(score) => {
            error!(
                "Non-finite score {score} for {} <> {}, using 0.0",
                pair.head_id, pair.tail_id
            );
            0.0
        }
        Err(e) => {
            error!(
                "Scoring failed for {} <> {}: {e}",
                pair.head_id, pair.tail_id
            );
            0.0
        }
    }
}

/// Default number of words compared at the seam between head and tail
pub const DEFAULT_SEAM_WORDS: usize = 40;

/// Deterministic lexical heuristic.
///
/// Compares the vocabulary at the end of the head with the vocabulary at the
/// start of the tail, with a bonus when the head stops mid-sentence.
#[derive(Debug, Clone)]
pub struct LexicalOracle {
    /// Words taken from each side of the seam
    pub seam_words: usize,
    /// Added when the head does not end with terminal punctuation
    pub open_sentence_bonus: f64,
}

impl Default for LexicalOracle {
    fn default() -> Self {
        Self {
            seam_words: DEFAULT_SEAM_WORDS,
            open_sentence_bonus: 0.2,
        }
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

fn ends_open(text: &str) -> bool {
    !text
        .trim_end()
        .ends_with(['.', '!', '?', '\u{061F}', '\u{06D4}'])
}

/// Jaccard similarity: |A ∩ B| / |A ∪ B|
///
/// Returns 0.0 when both sets are empty.
fn jaccard_similarity<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        count_to_f64(intersection) / count_to_f64(union)
    }
}

impl CompatibilityOracle for LexicalOracle {
    fn score(&self, pair: &TextPair<'_>) -> Result<f64, OracleError> {
        let head_words = words(pair.head_text);
        let tail_words = words(pair.tail_text);

        let head_seam: HashSet<&str> = head_words
            .iter()
            .rev()
            .take(self.seam_words)
            .map(String::as_str)
            .collect();
        let tail_seam: HashSet<&str> = tail_words
            .iter()
            .take(self.seam_words)
            .map(String::as_str)
            .collect();

        let bonus = if ends_open(pair.head_text) {
            self.open_sentence_bonus
        } else {
            0.0
        };
        let overlap = jaccard_similarity(&head_seam, &tail_seam);

        Ok((overlap * (1.0 - self.open_sentence_bonus) + bonus).clamp(0.0, 1.0))
    }
}

/// Fixed table of scores keyed by fragment identity.
///
/// Pairs not in the table score 0.0.
#[derive(Debug, Clone, Default)]
pub struct LookupOracle {
    scores: HashMap<(FragmentId, FragmentId), f64>,
}

impl LookupOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the score of one pair
    #[must_use]
    pub fn with_score(mut self, head: &str, tail: &str, score: f64) -> Self {
        self.insert(FragmentId::new(head), FragmentId::new(tail), score);
        self
    }

    pub fn insert(&mut self, head: FragmentId, tail: FragmentId, score: f64) {
        self.scores.insert((head, tail), score);
    }

    #[must_use]
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut oracle = Self::new();
        for entry in entries {
            oracle.insert(entry.head, entry.tail, entry.score);
        }
        oracle
    }

    /// Load a `head<TAB>tail<TAB>score` table (comma separated for `.csv`)
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_entries(parse_score_file(path)?))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl CompatibilityOracle for LookupOracle {
    fn score(&self, pair: &TextPair<'_>) -> Result<f64, OracleError> {
        Ok(self
            .scores
            .get(&(pair.head_id.clone(), pair.tail_id.clone()))
            .copied()
            .unwrap_or(0.0))
    }
}

/// Delegates scoring to an external program, one process per pair.
///
/// The program receives the head text, a NUL byte and the tail text on stdin
/// and must print a single number on stdout. No timeout is applied: a hung
/// program blocks the run.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace into program and arguments
    ///
    /// # Errors
    ///
    /// Returns `OracleError::Command` if the command line is empty.
    pub fn parse(command_line: &str) -> Result<Self, OracleError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| OracleError::Command("empty scoring command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }
}

/// `head\0tail` on the program's stdin; the pipe closes when `stdin` is dropped
fn write_pair(stdin: &mut impl Write, pair: &TextPair<'_>) -> std::io::Result<()> {
    stdin.write_all(pair.head_text.as_bytes())?;
    stdin.write_all(b"\0")?;
    stdin.write_all(pair.tail_text.as_bytes())
}

impl CompatibilityOracle for CommandOracle {
    fn score(&self, pair: &TextPair<'_>) -> Result<f64, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        // A program may answer without reading all of stdin; the closed pipe is
        // not an error, the exit status and stdout decide.
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| write_pair(&mut stdin, pair));

        let output = child.wait_with_output()?;
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        if !output.status.success() {
            return Err(OracleError::Command(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f64>()
            .map_err(|_| OracleError::InvalidOutput(stdout.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(
        head_id: &'a FragmentId,
        tail_id: &'a FragmentId,
        head_text: &'a str,
        tail_text: &'a str,
    ) -> TextPair<'a> {
        TextPair {
            head_id,
            tail_id,
            head_text,
            tail_text,
        }
    }

    struct FailingOracle;

    impl CompatibilityOracle for FailingOracle {
        fn score(&self, _pair: &TextPair<'_>) -> Result<f64, OracleError> {
            Err(OracleError::Command("model unavailable".to_string()))
        }
    }

    #[test]
    fn test_jaccard_similarity() {
        let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let b: HashSet<i32> = [2, 3, 4].into_iter().collect();
        assert!((jaccard_similarity(&a, &b) - 0.5).abs() < 0.001);

        let empty: HashSet<i32> = HashSet::new();
        assert!((jaccard_similarity(&empty, &empty) - 0.0).abs() < 0.001);
        assert!((jaccard_similarity(&a, &empty) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_score_or_zero_empty_inputs() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        let always_one = |_: &str, _: &str| 1.0;
        assert!((score_or_zero(&always_one, &pair(&h, &t, "", "x")) - 0.0).abs() < f64::EPSILON);
        assert!((score_or_zero(&always_one, &pair(&h, &t, "x", "")) - 0.0).abs() < f64::EPSILON);
        assert!((score_or_zero(&always_one, &pair(&h, &t, "x", "y")) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_or_zero_degrades_failures() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        assert!((score_or_zero(&FailingOracle, &pair(&h, &t, "a", "b")) - 0.0).abs() < f64::EPSILON);

        let nan = |_: &str, _: &str| f64::NAN;
        assert!((score_or_zero(&nan, &pair(&h, &t, "a", "b")) - 0.0).abs() < f64::EPSILON);

        let too_big = |_: &str, _: &str| 3.5;
        assert!((score_or_zero(&too_big, &pair(&h, &t, "a", "b")) - 1.0).abs() < f64::EPSILON);
        let negative = |_: &str, _: &str| -0.5;
        assert!((score_or_zero(&negative, &pair(&h, &t, "a", "b")) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lexical_oracle_prefers_shared_vocabulary() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        let oracle = LexicalOracle::default();
        let head = "Vente aux enchères publiques du terrain situé à Casablanca";
        let related = "terrain situé à Casablanca, mise à prix fixée";
        let unrelated = "Avis de constitution de société anonyme";

        let good = oracle.score(&pair(&h, &t, head, related)).unwrap();
        let bad = oracle.score(&pair(&h, &t, head, unrelated)).unwrap();
        assert!(good > bad, "{good} should exceed {bad}");
        assert!((0.0..=1.0).contains(&good));
    }

    #[test]
    fn test_lexical_oracle_open_sentence_bonus() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        let oracle = LexicalOracle::default();
        let open = oracle.score(&pair(&h, &t, "alpha beta", "gamma delta")).unwrap();
        let closed = oracle.score(&pair(&h, &t, "alpha beta.", "gamma delta")).unwrap();
        assert!((open - 0.2).abs() < 1e-9);
        assert!((closed - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_oracle() {
        let oracle = LookupOracle::new().with_score("h1", "t1", 0.75);
        let (h1, t1, t2) = (FragmentId::new("h1"), FragmentId::new("t1"), FragmentId::new("t2"));
        assert!((oracle.score(&pair(&h1, &t1, "a", "b")).unwrap() - 0.75).abs() < 1e-9);
        assert!((oracle.score(&pair(&h1, &t2, "a", "b")).unwrap() - 0.0).abs() < 1e-9);
        assert_eq!(oracle.len(), 1);
    }

    #[test]
    fn test_command_oracle_parse() {
        assert!(CommandOracle::parse("   ").is_err());
        let oracle = CommandOracle::parse("python3 nsp.py --device cpu").unwrap();
        assert_eq!(oracle.program, "python3");
        assert_eq!(oracle.args, vec!["nsp.py", "--device", "cpu"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_oracle_reads_stdout() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        let oracle = CommandOracle::new("sh", vec!["-c".into(), "cat >/dev/null; echo 0.42".into()]);
        let score = oracle.score(&pair(&h, &t, "a", "b")).unwrap();
        assert!((score - 0.42).abs() < 1e-9);

        let failing = CommandOracle::new("sh", vec!["-c".into(), "cat >/dev/null; exit 3".into()]);
        assert!(failing.score(&pair(&h, &t, "a", "b")).is_err());
        assert!((score_or_zero(&failing, &pair(&h, &t, "a", "b")) - 0.0).abs() < f64::EPSILON);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_oracle_ignores_unread_stdin() {
        let (h, t) = (FragmentId::new("h"), FragmentId::new("t"));
        let head = "a".repeat(1000);
        let tail = "b".repeat(1000);
        let oracle = CommandOracle::new("sh", vec!["-c".into(), "echo 0.5".into()]);

        for _ in 0..200 {
            let score = oracle.score(&pair(&h, &t, &head, &tail)).unwrap();
            assert!((score - 0.5).abs() < 1e-9);
        }
    }
}
