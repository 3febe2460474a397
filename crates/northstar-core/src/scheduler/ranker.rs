//! Turns knowledge base answers into ranked suggestions.

use std::collections::{BTreeMap, HashSet};

use super::facts::PENDING;
use super::policy::PolicyConfig;
use crate::rules::{clause, KnowledgeBase, Term};
use crate::schedule::ScheduledSuggestion;

/// Tag and reason recorded for goal-critical tasks.
pub const GOAL_CRITICAL: &str = "goal-critical";

/// Running score for one candidate task.
#[derive(Debug, Default)]
struct Tally {
    score: i64,
    tags: Vec<String>,
    reasons: Vec<String>,
}

impl Tally {
    fn apply(&mut self, delta: i64, tag: String, reason: String) {
        self.score = self.score.saturating_add(delta);
        self.tags.push(tag);
        self.reasons.push(reason);
    }

    fn into_suggestion(self, task_id: i64) -> ScheduledSuggestion {
        let mut seen = HashSet::new();
        let tags = self
            .tags
            .into_iter()
            .filter(|tag| seen.insert(tag.clone()))
            .collect();
        ScheduledSuggestion {
            task_id,
            score: self.score,
            tags,
            reason: self.reasons.join(", "),
        }
    }
}

/// Rank pending, non-avoided tasks.
///
/// Output is sorted by descending score; equal scores keep ascending task id.
pub fn rank(kb: &KnowledgeBase, policy: &PolicyConfig) -> Vec<ScheduledSuggestion> {
    let t = || Term::var("t");

    let avoided: HashSet<i64> = kb
        .query(&clause("avoid", vec![t()]))
        .iter()
        .filter_map(|a| a.number("t"))
        .collect();

    // Keyed by task id so ties fall back to id order.
    let mut tallies: BTreeMap<i64, Tally> = BTreeMap::new();
    let pending = kb.query(&clause("task-status", vec![t(), Term::sym(PENDING)]));
    for id in pending.iter().filter_map(|a| a.number("t")) {
        if avoided.contains(&id) {
            continue;
        }
        let base = kb
            .query(&clause("task-align", vec![Term::num(id), Term::var("sc")]))
            .first()
            .and_then(|a| a.number("sc"))
            .unwrap_or(0);
        tallies.insert(
            id,
            Tally {
                score: base,
                tags: Vec::new(),
                reasons: vec!["alignment".to_string()],
            },
        );
    }

    let adjustments = [("boost", 1, "boost", '+'), ("penalty", -1, "penalty", '-')];
    for (predicate, sign, fallback_tag, symbol) in adjustments {
        let answers = kb.query(&clause(predicate, vec![t(), Term::var("delta"), Term::var("tag")]));
        for answer in answers {
            let Some(tally) = answer.number("t").and_then(|id| tallies.get_mut(&id)) else {
                continue;
            };
            let delta = answer.number("delta").unwrap_or(0);
            let tag = answer.symbol("tag").unwrap_or(fallback_tag).to_string();
            let reason = format!("{symbol}{delta} {tag}");
            tally.apply(delta.saturating_mul(sign), tag, reason);
        }
    }

    for answer in kb.query(&clause(GOAL_CRITICAL, vec![t()])) {
        if let Some(tally) = answer.number("t").and_then(|id| tallies.get_mut(&id)) {
            tally.apply(
                policy.goal_critical_bonus,
                GOAL_CRITICAL.to_string(),
                GOAL_CRITICAL.to_string(),
            );
        }
    }

    let candidates = pending.len();
    let mut suggestions: Vec<ScheduledSuggestion> = tallies
        .into_iter()
        .map(|(id, tally)| tally.into_suggestion(id))
        .collect();
    // Stable: ties keep ascending id order from the map.
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        candidates,
        avoided = avoided.len(),
        emitted = suggestions.len(),
        "ranked suggestions"
    );
    suggestions
}
