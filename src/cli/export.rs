use std::path::PathBuf;

use clap::Args;

use crate::cli::{NamingArgs, OutputFormat};
use crate::core::layout::RunLayout;
use crate::output::export::{export_articles, ArticleFiles, ExportedArticle};

#[derive(Args)]
pub struct ExportArgs {
    /// Run folder named `<journal> - <lang> - <YYYY-MM-DD>`
    #[arg(required = true)]
    pub run_dir: PathBuf,

    /// Output JSON file (default: `<run_dir>/articles_final.json`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub naming: NamingArgs,
}

/// Execute the export command
///
/// # Errors
///
/// Returns an error if the JSON file cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ExportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layout = RunLayout::new(&args.run_dir);
    let output = args.output.clone().unwrap_or_else(|| layout.export_path());
    let articles = export_articles(&layout, &args.naming.naming(), Some(output.as_path()))?;

    if verbose {
        eprintln!("Exported {} article(s) to {}", articles.len(), output.display());
    }

    print_summary(&articles, &output, format)
}

pub(crate) fn print_summary(
    articles: &[ExportedArticle],
    output: &std::path::Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Article Export");
            println!("{}", "=".repeat(60));
            println!("  Articles: {}", articles.len());
            let combined = articles
                .iter()
                .filter(|a| matches!(a.file, ArticleFiles::Many(_)))
                .count();
            println!("  Reconstructed: {combined}");
            println!("  Standalone: {}", articles.len() - combined);
            println!("  Output: {}", output.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "output": output.display().to_string(),
                "article_count": articles.len(),
                "references": articles.iter().map(|a| a.reference.clone()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("title\treference\tpage");
            for article in articles {
                println!(
                    "{}\t{}\t{}",
                    article.title,
                    article.reference.as_deref().unwrap_or_default(),
                    article.page.map(|p| p.to_string()).unwrap_or_default(),
                );
            }
        }
    }
    Ok(())
}
