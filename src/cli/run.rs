//! Run command - the full article pipeline over one issue.
//!
//! 1. Detect incomplete heads in `ocr_text/` and copy them to `incomplets/`
//! 2. Associate heads with tails, only when `ocr_text/` holds at least one tail
//! 3. Export every complete article to `articles_final.json`

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::{association_config, NamingArgs, OracleArgs, OutputFormat};
use crate::core::layout::RunLayout;
use crate::detection::incomplete::detect_incomplete;
use crate::output::export::export_articles;
use crate::parsing::loader::count_fragments;
use crate::pipeline::associate_run;

#[derive(Args)]
pub struct RunArgs {
    /// Run folder named `<journal> - <lang> - <YYYY-MM-DD>`
    #[arg(required = true)]
    pub run_dir: PathBuf,

    #[command(flatten)]
    pub oracle: OracleArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

/// Execute the run command
///
/// # Errors
///
/// Returns an error if any stage fails to write its outputs.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layout = RunLayout::new(&args.run_dir);
    let config = association_config(&args.oracle, &args.naming);

    info!("Processing {}", layout.folder_name());

    let detection = detect_incomplete(&layout, &config.naming.head_token)?;
    if verbose {
        eprintln!(
            "Detection: {} complete, {} incomplete",
            detection.complete.len(),
            detection.incomplete.len()
        );
    }

    let tail_count = count_fragments(&layout.ocr_text_dir(), &config.naming.tail_token);
    let association = if tail_count > 0 {
        let oracle = args.oracle.build()?;
        Some(associate_run(&layout, oracle.as_ref(), &config)?)
    } else {
        info!("No {} fragments found, association skipped", config.naming.tail_token);
        None
    };

    let articles = export_articles(&layout, &config.naming, None)?;

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            super::detect::print_summary(&layout, &detection, format)?;
            if let Some(summary) = &association {
                println!();
                super::associate::print_summary(summary, format)?;
            }
            println!();
            super::export::print_summary(&articles, &layout.export_path(), format)?;
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "run_dir": layout.root().display().to_string(),
                "detection": detection,
                "association": association,
                "export": {
                    "output": layout.export_path().display().to_string(),
                    "article_count": articles.len(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
