//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a scrape run,
//! with one table row per seed and the errors each seed recorded.

use crate::output::stats::RunSummary;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary file
///
/// # Arguments
///
/// * `summary` - The run summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Blog-Scrape Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Totals\n\n");
    md.push_str(&format!("- **Seeds**: {}\n", summary.seeds.len()));
    md.push_str(&format!("- **Records**: {}\n", summary.total_records));
    md.push_str(&format!("- **Pages Fetched**: {}\n", summary.total_pages));
    md.push_str(&format!(
        "- **Errors**: {} ({} seeds affected)\n\n",
        summary.total_errors, summary.failed_seeds
    ));

    md.push_str("## Seeds\n\n");
    md.push_str("| Seed | Site | Records | Pages | Stopped |\n");
    md.push_str("|------|------|---------|-------|---------|\n");
    for seed in &summary.seeds {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            seed.seed,
            seed.site.as_deref().unwrap_or("-"),
            seed.records,
            seed.pages_fetched,
            seed.stop_reason
        ));
    }
    md.push('\n');

    let with_errors: Vec<_> = summary
        .seeds
        .iter()
        .filter(|s| !s.errors.is_empty())
        .collect();
    if !with_errors.is_empty() {
        md.push_str("## Errors\n\n");
        for seed in with_errors {
            md.push_str(&format!("### {}\n\n", seed.seed));
            for error in &seed.errors {
                md.push_str(&format!("- {}\n", error));
            }
            md.push('\n');
        }
    }

    md
}
