//! Score command - score one head/tail pair with the configured oracle.
//!
//! Useful for checking an external scoring program or a score table before
//! running a full association.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{OracleArgs, OutputFormat};
use crate::core::types::FragmentId;
use crate::matching::oracle::{score_or_zero, TextPair};
use crate::parsing::loader::{load_text, LoadedText};
use crate::utils::validation::truncate_chars;

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Head fragment (the incomplete article)
    #[arg(required = true)]
    pub head: PathBuf,

    /// Tail fragment (the candidate continuation)
    #[arg(required = true)]
    pub tail: PathBuf,

    #[command(flatten)]
    pub oracle: OracleArgs,
}

/// One side of the scored pair
struct ScoredFile<'a> {
    id: FragmentId,
    path: &'a Path,
    loaded: LoadedText,
}

impl<'a> ScoredFile<'a> {
    fn load(path: &'a Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: FragmentId::new(name),
            path,
            loaded: load_text(path),
        }
    }

    fn char_count(&self) -> usize {
        self.loaded.text.chars().count()
    }
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if the oracle cannot be built or output fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let oracle = args.oracle.build()?;
    let head = ScoredFile::load(&args.head);
    let tail = ScoredFile::load(&args.tail);

    if verbose {
        eprintln!("Oracle: {}", args.oracle.describe());
        for (label, file) in [("head", &head), ("tail", &tail)] {
            eprintln!(
                "{} ({label}): {} chars, language {}",
                file.id,
                file.char_count(),
                file.loaded.language
            );
        }
    }

    // Empty text scores 0.0 without consulting the oracle, as in a full run
    let score = if head.loaded.text.is_empty() || tail.loaded.text.is_empty() {
        0.0
    } else {
        let pair = TextPair {
            head_id: &head.id,
            tail_id: &tail.id,
            head_text: truncate_chars(&head.loaded.text, args.oracle.max_chars),
            tail_text: truncate_chars(&tail.loaded.text, args.oracle.max_chars),
        };
        score_or_zero(oracle.as_ref(), &pair)
    };

    match format {
        OutputFormat::Text => print_text_result(&head, &tail, score),
        OutputFormat::Json => print_json_result(&head, &tail, score)?,
        OutputFormat::Tsv => {
            println!("article_00\tarticle_01\tsimilarity");
            println!("{}\t{}\t{score:.4}", head.id, tail.id);
        }
    }

    Ok(())
}

fn print_text_result(head: &ScoredFile<'_>, tail: &ScoredFile<'_>, score: f64) {
    println!("Pair Score");
    println!("{}", "=".repeat(60));
    println!("\nHead: {}", head.id);
    println!("  Language: {}", head.loaded.language);
    println!("  Characters: {}", head.char_count());
    println!("\nTail: {}", tail.id);
    println!("  Language: {}", tail.loaded.language);
    println!("  Characters: {}", tail.char_count());
    println!("\nSimilarity: {score:.4}");
}

fn side_json(file: &ScoredFile<'_>) -> serde_json::Value {
    serde_json::json!({
        "id": file.id,
        "path": file.path.display().to_string(),
        "language": file.loaded.language,
        "char_count": file.char_count(),
    })
}

fn print_json_result(head: &ScoredFile<'_>, tail: &ScoredFile<'_>, score: f64) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "head": side_json(head),
        "tail": side_json(tail),
        "similarity": score,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
