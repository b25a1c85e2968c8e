//! Search command - ranked full-text search across transcripts

use anyhow::{bail, Result};
use colored::Colorize;
use session_core::ContentKind;
use session_indexer::{validate_query, SearchOptions};

use super::open_indexer;
use crate::cli::{Cli, KindArg, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn run(
    cli: &Cli,
    query: Option<&str>,
    kind: Option<KindArg>,
    limit: i64,
    session: Option<&str>,
) -> Result<()> {
    // Validate before opening the index
    let Some(query) = query else {
        bail!("--query required for search command");
    };
    let query = validate_query(query)?;

    let indexer = open_indexer(cli)?;

    let mut options = SearchOptions::new(query)
        .with_kind(kind.map(ContentKind::from))
        .with_limit(limit);
    if let Some(sid) = session {
        options = options.for_session(sid);
    }

    let hits = indexer.search_with(&options)?;

    match cli.format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("No results found for: {}", query.cyan());
                return Ok(());
            }
            println!(
                "{}",
                colors::header(&format!("Search results for '{}' ({})", query, hits.len()))
            );
            for hit in &hits {
                println!();
                println!("{}", human::format_hit(hit));
            }
        }
        OutputFormat::Json => {
            for hit in &hits {
                println!("{}", json::format_hit(hit));
            }
        }
        OutputFormat::Minimal => {
            for hit in &hits {
                println!("{}", minimal::format_hit(hit));
            }
        }
    }

    Ok(())
}
