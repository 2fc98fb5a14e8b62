//! Command-line interface for article-joiner.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **detect**: Copy head fragments without a trailing reference into `incomplets/`
//! - **associate**: Pair incomplete heads with continuation tails and write the report
//! - **score**: Score one head/tail pair with the configured oracle
//! - **export**: Write `articles_final.json` for a run folder
//! - **run**: Detect, associate (when tails exist), then export
//!
//! ## Usage
//!
//! ```text
//! # Full pipeline over one issue
//! article-joiner run "Daily - fr - 2024-01-02"
//!
//! # Replay scores computed by an external model
//! article-joiner associate "Daily - fr - 2024-01-02" --scores scores.tsv
//!
//! # Delegate scoring to a program reading head\0tail on stdin
//! article-joiner associate "Daily - fr - 2024-01-02" --oracle-cmd "python score.py"
//!
//! # JSON output for scripting
//! article-joiner score head.txt tail.txt --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::matching::engine::{MatchingConfig, DEFAULT_MAX_CHARS};
use crate::matching::oracle::{CommandOracle, CompatibilityOracle, LexicalOracle, LookupOracle};
use crate::parsing::naming::{FragmentNaming, COMBINED_TOKEN, HEAD_TOKEN, IMAGE_EXTENSION, TAIL_TOKEN};
use crate::pipeline::AssociationConfig;

pub mod associate;
pub mod detect;
pub mod export;
pub mod run;
pub mod score;

#[derive(Parser)]
#[command(name = "article-joiner")]
#[command(version)]
#[command(about = "Reassemble newspaper articles split across OCR segments")]
#[command(
    long_about = "article-joiner pairs article fragments that the layout detector cut in two.\n\nHeads are fragments known to be incomplete (no trailing reference code); tails are candidate continuations. Each head is paired with at most one tail by greedy best-score selection, matched pairs are written as combined articles, and every head is recorded in an association report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find incomplete head fragments in a run folder
    Detect(detect::DetectArgs),

    /// Pair incomplete heads with continuation tails
    Associate(associate::AssociateArgs),

    /// Score a single head/tail pair
    Score(score::ScoreArgs),

    /// Export the run's articles as JSON
    Export(export::ExportArgs),

    /// Run detection, association and export in sequence
    Run(run::RunArgs),
}

/// Which compatibility oracle scores head/tail pairs
#[derive(Args, Debug, Clone)]
pub struct OracleArgs {
    /// Score table (`head<TAB>tail<TAB>score`, comma separated for .csv);
    /// pairs absent from the table score 0
    #[arg(long, conflicts_with = "oracle_cmd")]
    pub scores: Option<PathBuf>,

    /// External scoring command, run once per pair with `head\0tail` on stdin
    #[arg(long)]
    pub oracle_cmd: Option<String>,

    /// Maximum characters of each text handed to the oracle
    #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,
}

impl OracleArgs {
    /// Build the oracle: score table, external command, or the lexical default
    ///
    /// # Errors
    ///
    /// Returns an error if the score table cannot be read or the command line
    /// is empty.
    pub fn build(&self) -> anyhow::Result<Box<dyn CompatibilityOracle>> {
        if let Some(path) = &self.scores {
            let oracle = LookupOracle::from_file(path)?;
            tracing::info!("Loaded {} scores from {}", oracle.len(), path.display());
            return Ok(Box::new(oracle));
        }
        if let Some(command) = &self.oracle_cmd {
            return Ok(Box::new(CommandOracle::parse(command)?));
        }
        Ok(Box::new(LexicalOracle::default()))
    }

    #[must_use]
    pub fn matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            max_chars: self.max_chars,
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.scores, &self.oracle_cmd) {
            (Some(path), _) => format!("score table {}", path.display()),
            (None, Some(command)) => format!("command `{command}`"),
            (None, None) => "lexical".to_string(),
        }
    }
}

/// File-name tokens tying fragments to their roles
#[derive(Args, Debug, Clone)]
pub struct NamingArgs {
    /// Token marking head-role fragments
    #[arg(long, default_value = HEAD_TOKEN)]
    pub head_token: String,

    /// Token marking tail-role fragments
    #[arg(long, default_value = TAIL_TOKEN)]
    pub tail_token: String,

    /// Token used in reconstructed article names
    #[arg(long, default_value = COMBINED_TOKEN)]
    pub combined_token: String,

    /// Extension of page images
    #[arg(long, default_value = IMAGE_EXTENSION)]
    pub image_extension: String,
}

impl NamingArgs {
    #[must_use]
    pub fn naming(&self) -> FragmentNaming {
        FragmentNaming {
            head_token: self.head_token.clone(),
            tail_token: self.tail_token.clone(),
            combined_token: self.combined_token.clone(),
            image_extension: self.image_extension.clone(),
        }
    }
}

/// Assemble the association settings from CLI flags
#[must_use]
pub fn association_config(oracle: &OracleArgs, naming: &NamingArgs) -> AssociationConfig {
    AssociationConfig {
        matching: oracle.matching_config(),
        naming: naming.naming(),
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
