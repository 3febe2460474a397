//! Ranked task suggestions for a snapshot.

use chrono::Timelike;
use clap::Args;
use std::path::PathBuf;

use northstar_core::{Config, MissionScheduler, TitledSuggestion};

use super::read_input;

#[derive(Args)]
pub struct SuggestArgs {
    /// Snapshot JSON file with user, tasks, goals ("-" for stdin)
    #[arg(long, short)]
    input: PathBuf,
    /// Override the clock (local YYYY-MM-DDTHH:MM[:SS], or RFC 3339 converted to local time)
    #[arg(long)]
    now: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Maximum suggestions to print (0 = all); defaults to output.limit
    #[arg(long)]
    limit: Option<u32>,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let input = read_input(&args.input, args.now.as_deref())?;

    let scheduler = MissionScheduler::new(config.policy.clone());
    let limit = args.limit.unwrap_or(config.output.limit) as usize;
    let suggestions: Vec<TitledSuggestion> = scheduler
        .infer_suggestions(&input)
        .into_iter()
        .take(if limit == 0 { usize::MAX } else { limit })
        .map(|s| s.with_title(&input.tasks))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No task suggestions available.");
        println!("  Make sure the snapshot has pending, titled tasks.");
        return Ok(());
    }

    println!("=== Task Suggestions ===\n");
    for (i, titled) in suggestions.iter().enumerate() {
        let s = &titled.suggestion;
        println!("{}. {} (Score: {})", i + 1, titled.title, s.score);
        if !s.tags.is_empty() {
            println!("   Tags: {}", s.tags.join(", "));
        }
        if config.output.show_reasons {
            println!("   Reason: {}", s.reason);
        }
        println!();
    }

    let now = input.clock();
    match scheduler.policy().active_window(now.hour()) {
        Some(w) => println!("Context: {} ({})", w.tag(), now.format("%H:%M")),
        None => println!("Context: none ({})", now.format("%H:%M")),
    }
    Ok(())
}
