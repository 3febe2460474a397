//! Knowledge base inspection: dump facts and rules, or run a query.

use clap::Subcommand;
use std::path::PathBuf;

use northstar_core::rules::VAR_SIGIL;
use northstar_core::{Clause, Config, MissionScheduler, Substitution};

use super::read_input;

#[derive(Subcommand)]
pub enum KbAction {
    /// Print every fact and rule built for a snapshot
    Dump {
        /// Snapshot JSON file ("-" for stdin)
        #[arg(long, short)]
        input: PathBuf,
        /// Override the clock
        #[arg(long)]
        now: Option<String>,
        /// Only print facts with this predicate
        #[arg(long)]
        predicate: Option<String>,
    },
    /// Run a query, e.g. `boost ?t ?delta ?tag`
    Query {
        /// Snapshot JSON file ("-" for stdin)
        #[arg(long, short)]
        input: PathBuf,
        /// Override the clock
        #[arg(long)]
        now: Option<String>,
        /// Print answers as JSON
        #[arg(long)]
        json: bool,
        /// Clause tokens: predicate followed by arguments
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        clause: Vec<String>,
    },
}

pub fn run(action: KbAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let scheduler = MissionScheduler::new(config.policy);

    match action {
        KbAction::Dump { input, now, predicate } => {
            let input = read_input(&input, now.as_deref())?;
            let kb = scheduler.build_knowledge_base(&input);

            println!("# facts");
            for fact in kb.facts() {
                if predicate.as_deref().map_or(true, |p| p == fact.predicate) {
                    println!("{fact}");
                }
            }
            if predicate.is_none() {
                println!("\n# rules");
                for rule in kb.rules() {
                    let body: Vec<String> = rule.body.iter().map(ToString::to_string).collect();
                    println!("{} :- {}", rule.head, body.join(", "));
                    if let Some(description) = &rule.description {
                        println!("    ; {description}");
                    }
                }
                println!("\n# native predicates");
                println!("{}", kb.natives().join(", "));
            }
        }
        KbAction::Query { input, now, json, clause } => {
            let input = read_input(&input, now.as_deref())?;
            let goal: Clause = clause.join(" ").parse()?;
            let kb = scheduler.build_knowledge_base(&input);
            let answers = kb.query(&goal);

            if json {
                println!("{}", serde_json::to_string_pretty(&answers)?);
                return Ok(());
            }

            if answers.is_empty() {
                println!("no");
                return Ok(());
            }
            for answer in &answers {
                if answer.is_empty() {
                    println!("yes");
                    continue;
                }
                println!("{}", format_answer(answer));
            }
        }
    }
    Ok(())
}

/// One answer as `x = v, y = w`, variable names without their sigil.
fn format_answer(answer: &Substitution) -> String {
    let bindings: Vec<String> = answer
        .iter()
        .map(|(name, term)| format!("{} = {term}", name.trim_start_matches(VAR_SIGIL)))
        .collect();
    bindings.join(", ")
}
