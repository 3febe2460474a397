//! Mission-aligned task scheduler.
//!
//! Every call builds a fresh knowledge base from the request, queries it a
//! fixed number of times and throws it away:
//!
//! 1. Pending tasks are the candidates; `avoid` (distractions) removes some.
//! 2. Each candidate starts from its alignment score.
//! 3. `boost` and `penalty` answers add or subtract their delta.
//! 4. `goal-critical` tasks get a flat bonus, which compounds with any
//!    midday boost they already received.
//!
//! Nothing is cached between calls, so concurrent callers need no locking.

mod facts;
mod policy;
mod ranker;

pub use facts::{build_knowledge_base, DONE, PENDING};
pub use policy::{FocusWindow, HourWindow, PolicyConfig};
pub use ranker::{rank, GOAL_CRITICAL};

use crate::rules::KnowledgeBase;
use crate::schedule::{SchedulerInput, ScheduledSuggestion};

/// Scheduler bound to one policy.
#[derive(Debug, Clone, Default)]
pub struct MissionScheduler {
    policy: PolicyConfig,
}

impl MissionScheduler {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Knowledge base for one request, for inspection or ad-hoc queries.
    pub fn build_knowledge_base(&self, input: &SchedulerInput) -> KnowledgeBase {
        build_knowledge_base(input, &self.policy)
    }

    /// Ranked suggestions for one request.
    pub fn infer_suggestions(&self, input: &SchedulerInput) -> Vec<ScheduledSuggestion> {
        let kb = self.build_knowledge_base(input);
        rank(&kb, &self.policy)
    }
}

/// [`MissionScheduler::infer_suggestions`] with the default policy.
pub fn infer_suggestions(input: &SchedulerInput) -> Vec<ScheduledSuggestion> {
    MissionScheduler::default().infer_suggestions(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Goal, Task, UserContext};
    use chrono::NaiveDate;

    fn input_at(hour: u32, tasks: Vec<Task>, goals: Vec<Goal>) -> SchedulerInput {
        let now = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        SchedulerInput::new(UserContext::new("founder"))
            .with_tasks(tasks)
            .with_goals(goals)
            .at(now)
    }

    fn aligned(id: i64, score: i64) -> Task {
        let mut t = Task::new(id, format!("Task {id}"));
        t.alignment_score = Some(score);
        t
    }

    #[test]
    fn admin_window_penalizes_prioritized_tasks() {
        let out = infer_suggestions(&input_at(17, vec![aligned(1, 90)], vec![]));
        assert_eq!(out[0].score, 82);
        assert_eq!(out[0].tags, vec!["admin-window"]);
        assert_eq!(out[0].reason, "alignment, -8 admin-window");
    }

    #[test]
    fn no_window_outside_defined_hours() {
        let out = infer_suggestions(&input_at(22, vec![aligned(1, 90)], vec![]));
        assert_eq!(out[0].score, 90);
        assert!(out[0].tags.is_empty());
        assert_eq!(out[0].reason, "alignment");
    }

    #[test]
    fn threshold_is_inclusive() {
        let out = infer_suggestions(&input_at(9, vec![aligned(1, 80), aligned(2, 79)], vec![]));
        let by_id = |id| out.iter().find(|s| s.task_id == id).unwrap();
        assert_eq!(by_id(1).score, 90);
        assert_eq!(by_id(2).score, 79);
    }

    #[test]
    fn custom_policy_changes_deltas() {
        let scheduler = MissionScheduler::new(PolicyConfig {
            morning_boost: 20,
            prioritize_threshold: 50,
            ..PolicyConfig::default()
        });
        let out = scheduler.infer_suggestions(&input_at(8, vec![aligned(1, 60)], vec![]));
        assert_eq!(out[0].score, 80);
        assert_eq!(out[0].reason, "alignment, +20 morning-focus");
    }

    #[test]
    fn goal_critical_bonus_applies_outside_midday() {
        let mut goal = Goal::new(7, "Revenue");
        goal.current_value = Some(1);
        goal.target_value = Some(10);
        let mut task = aligned(3, 40);
        task.goal_id = Some(7);

        let out = infer_suggestions(&input_at(9, vec![task], vec![goal]));
        assert_eq!(out[0].score, 45);
        assert_eq!(out[0].tags, vec!["goal-critical"]);
        assert_eq!(out[0].reason, "alignment, goal-critical");
    }

    #[test]
    fn sorted_descending_by_score() {
        let out = infer_suggestions(&input_at(
            22,
            vec![aligned(1, 10), aligned(2, 70), aligned(3, 40)],
            vec![],
        ));
        let ids: Vec<i64> = out.iter().map(|s| s.task_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = input_at(9, vec![aligned(1, 85)], vec![]);
        let before = input.clone();
        let _ = infer_suggestions(&input);
        assert_eq!(input, before);
    }
}
