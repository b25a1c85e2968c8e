//! Index commands - build, rebuild and status

use anyhow::Result;

use super::open_indexer;
use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

/// Incremental build; per-transcript failures are logged, not fatal
pub fn build(cli: &Cli, force: bool) -> Result<()> {
    let mut indexer = open_indexer(cli)?;
    let report = indexer.build(force)?;

    match cli.format {
        OutputFormat::Human => println!("{}", human::format_report(&report)),
        OutputFormat::Json => println!("{}", json::format_report(&report)),
        OutputFormat::Minimal => println!("{}", minimal::format_report(&report)),
    }

    Ok(())
}

pub fn rebuild(cli: &Cli) -> Result<()> {
    build(cli, true)
}

pub fn status(cli: &Cli) -> Result<()> {
    let indexer = open_indexer(cli)?;
    let stats = indexer.store().stats()?;
    let transcripts = indexer.store().transcripts()?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Index Status"));
            println!();
            for line in human::format_stats(&stats) {
                println!("{}", line);
            }
            println!(
                "  {}: {}",
                colors::label("Sessions dir"),
                indexer.sessions_dir().display()
            );
            if !transcripts.is_empty() {
                println!();
                println!("{}", colors::header("Indexed Sessions"));
                for record in &transcripts {
                    println!("  {}", human::format_transcript(record));
                }
            }
            println!();
            if stats.last_indexed.is_some() {
                println!("{}", colors::success("Index is healthy"));
            } else {
                println!(
                    "{}",
                    colors::warning("Index has never been built (run: session-index build)")
                );
            }
        }
        OutputFormat::Json => {
            let mut output = json::format_stats(&stats);
            output["sessions_dir"] =
                serde_json::json!(indexer.sessions_dir().to_string_lossy().to_string());
            output["sessions"] = serde_json::to_value(&transcripts)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{}", cli.db_path().display());
        }
    }

    Ok(())
}
