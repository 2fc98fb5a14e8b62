use std::path::PathBuf;

use clap::Args;

use crate::cli::{NamingArgs, OutputFormat};
use crate::core::layout::RunLayout;
use crate::detection::incomplete::{detect_incomplete, DetectionSummary};

#[derive(Args)]
pub struct DetectArgs {
    /// Run folder holding `ocr_text/`
    #[arg(required = true)]
    pub run_dir: PathBuf,

    #[command(flatten)]
    pub naming: NamingArgs,
}

/// Execute the detect command
///
/// # Errors
///
/// Returns an error if `incomplets/` cannot be created or a fragment cannot be copied.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: DetectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layout = RunLayout::new(&args.run_dir);
    let summary = detect_incomplete(&layout, &args.naming.head_token)?;

    if verbose {
        eprintln!(
            "Checked {} {} fragment(s) in {}",
            summary.total(),
            args.naming.head_token,
            layout.ocr_text_dir().display()
        );
    }

    print_summary(&layout, &summary, format)
}

pub(crate) fn print_summary(
    layout: &RunLayout,
    summary: &DetectionSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Incomplete Article Detection");
            println!("{}", "=".repeat(60));
            println!("  Checked: {}", summary.total());
            println!("  Complete: {}", summary.complete.len());
            println!("  Incomplete: {}", summary.incomplete.len());
            for name in &summary.incomplete {
                println!("    {name}");
            }
            println!("  Copied to: {}", layout.incomplete_dir().display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "run_dir": layout.root().display().to_string(),
                "complete": summary.complete,
                "incomplete": summary.incomplete,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("fragment\tstatus");
            for name in &summary.complete {
                println!("{name}\tcomplete");
            }
            for name in &summary.incomplete {
                println!("{name}\tincomplete");
            }
        }
    }
    Ok(())
}
