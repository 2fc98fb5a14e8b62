use std::path::PathBuf;

use clap::Args;

use crate::cli::{association_config, NamingArgs, OracleArgs, OutputFormat};
use crate::core::layout::RunLayout;
use crate::pipeline::{associate_run, RunSummary};

#[derive(Args)]
pub struct AssociateArgs {
    /// Run folder holding `ocr_text/` and `incomplets/`
    #[arg(required = true)]
    pub run_dir: PathBuf,

    #[command(flatten)]
    pub oracle: OracleArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

/// Execute the associate command
///
/// # Errors
///
/// Returns an error if the oracle cannot be built, or the reconstruction root
/// or report cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AssociateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layout = RunLayout::new(&args.run_dir);
    let oracle = args.oracle.build()?;
    let config = association_config(&args.oracle, &args.naming);

    if verbose {
        eprintln!(
            "Oracle: {} (max {} chars per text)",
            args.oracle.describe(),
            config.matching.max_chars
        );
    }

    let summary = associate_run(&layout, oracle.as_ref(), &config)?;
    print_summary(&summary, format)
}

pub(crate) fn print_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_summary(summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Tsv => print_tsv_summary(summary),
    }
    Ok(())
}

fn print_text_summary(summary: &RunSummary) {
    println!("Association Results");
    println!("{}", "=".repeat(60));

    if let Some(reason) = &summary.skipped {
        println!("  Skipped: {reason}");
        return;
    }

    println!("  Heads: {}", summary.heads);
    println!("  Tails: {}", summary.tails);
    println!("  Matched: {}", summary.matched_count());
    println!("  Unmatched: {}", summary.unmatched_count());

    if !summary.reconstructions.is_empty() {
        println!("\nReconstructed Articles:");
        for outcome in &summary.reconstructions {
            println!("  {} + {}", outcome.head, outcome.tail);
            println!("      Folder: {}", outcome.folder.display());
            println!("      Images: {}/2", outcome.images_copied);
            if let Some(error) = &outcome.error {
                println!("      Error: {error}");
            }
        }
    }

    if let Some(path) = &summary.report_path {
        println!("\nReport: {}", path.display());
    }
}

fn print_tsv_summary(summary: &RunSummary) {
    println!("page\tarticle_00\tarticle_01\tsimilarity\tstatus\timages_copied");
    for record in &summary.records {
        let images = summary
            .reconstructions
            .iter()
            .find(|o| o.head == record.article_00)
            .map(|o| o.images_copied.to_string())
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.page,
            record.article_00,
            record
                .article_01
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            record.similarity.as_deref().unwrap_or_default(),
            record.status,
            images,
        );
    }
}
