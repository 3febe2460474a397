//! Knowledge base construction from a scheduling request.
//!
//! Translates tasks, goals, the user profile and the clock into ground
//! facts, then declares the time-window and policy rules over them.

use chrono::{Datelike, NaiveDateTime, SecondsFormat, Timelike};

use super::policy::{FocusWindow, PolicyConfig};
use crate::rules::{clause, install_numeric_predicates, KnowledgeBase, Rule, Term};
use crate::schedule::{Goal, SchedulerInput, Task, UserContext};

/// Status symbol for tasks that are not completed.
pub const PENDING: &str = "pending";
/// Status symbol for completed tasks.
pub const DONE: &str = "done";

fn v(name: &str) -> Term {
    Term::var(name)
}

/// Build a fresh knowledge base for one request.
pub fn build_knowledge_base(input: &SchedulerInput, policy: &PolicyConfig) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    install_numeric_predicates(&mut kb);

    emit_user_facts(&mut kb, &input.user);
    emit_clock_facts(&mut kb, input.clock());
    for goal in &input.goals {
        emit_goal_facts(&mut kb, goal);
    }
    for task in &input.tasks {
        emit_task_facts(&mut kb, task);
    }

    declare_window_rules(&mut kb, policy);
    declare_policy_rules(&mut kb, policy);

    tracing::debug!(
        user = %input.user.user_id,
        facts = kb.facts().len(),
        rules = kb.rules().len(),
        "built scheduling knowledge base"
    );
    kb
}

/// `user`, `mission`, `focus-area` and `chronotype` facts. Text here is
/// provenance only; no rule matches on it.
fn emit_user_facts(kb: &mut KnowledgeBase, user: &UserContext) {
    let who = Term::sym(user.user_id.as_str());
    kb.add_fact("user", vec![who.clone()]);
    if let Some(mission) = user.mission.as_deref().filter(|m| !m.is_empty()) {
        kb.add_fact("mission", vec![who.clone(), Term::text(mission)]);
    }
    if let Some(areas) = user.focus_areas.as_deref().filter(|a| !a.is_empty()) {
        kb.add_fact("focus-area", vec![who.clone(), Term::text(areas)]);
    }
    if let Some(chronotype) = user.chronotype {
        kb.add_fact("chronotype", vec![who, Term::sym(chronotype.as_str())]);
    }
}

/// `hour` and `dow` (0 = Sunday).
fn emit_clock_facts(kb: &mut KnowledgeBase, now: NaiveDateTime) {
    kb.add_fact("hour", vec![Term::num(i64::from(now.hour()))]);
    kb.add_fact(
        "dow",
        vec![Term::num(i64::from(now.weekday().num_days_from_sunday()))],
    );
}

fn emit_goal_facts(kb: &mut KnowledgeBase, goal: &Goal) {
    let id = Term::num(goal.id);
    kb.add_fact("goal", vec![id.clone(), Term::text(goal.title.as_str())]);
    if let Some(current) = goal.current_value {
        kb.add_fact("goal-progress", vec![id.clone(), Term::num(current)]);
    }
    if let Some(target) = goal.target_value {
        kb.add_fact("goal-target", vec![id.clone(), Term::num(target)]);
    }
    if let Some(deadline) = goal.deadline {
        kb.add_fact(
            "goal-deadline",
            vec![id, Term::text(deadline.to_rfc3339_opts(SecondsFormat::Millis, true))],
        );
    }
}

/// Task facts. Untitled tasks are skipped entirely.
fn emit_task_facts(kb: &mut KnowledgeBase, task: &Task) {
    if task.title.is_empty() {
        return;
    }
    let id = Term::num(task.id);
    let status = if task.is_completed() { DONE } else { PENDING };

    kb.add_fact("task", vec![id.clone(), Term::text(task.title.as_str())]);
    kb.add_fact("task-cat", vec![id.clone(), Term::sym(task.category().as_str())]);
    kb.add_fact(
        "task-align",
        vec![id.clone(), Term::num(task.alignment_score.unwrap_or(0))],
    );
    kb.add_fact("task-status", vec![id.clone(), Term::sym(status)]);
    if let Some(goal_id) = task.goal_id.filter(|g| *g != 0) {
        kb.add_fact("task-goal", vec![id, Term::num(goal_id)]);
    }
}

/// `between` over the hour domain and one `context(<window>)` rule per window.
fn declare_window_rules(kb: &mut KnowledgeBase, policy: &PolicyConfig) {
    kb.add_rule(
        Rule::new(
            clause("between", vec![v("h"), v("a"), v("b")]),
            vec![
                clause("hour-domain", vec![v("h")]),
                clause("range", vec![v("a"), v("b")]),
                clause("ge", vec![v("h"), v("a")]),
                clause("le", vec![v("h"), v("b")]),
            ],
        )
        .describe("Hour within a closed interval"),
    );

    for window in FocusWindow::ALL {
        let hours = policy.window(window);
        kb.add_rule(
            Rule::new(
                clause("context", vec![Term::sym(window.tag())]),
                vec![
                    clause("hour", vec![v("h")]),
                    clause(
                        "between",
                        vec![
                            v("h"),
                            Term::num(i64::from(hours.start)),
                            Term::num(i64::from(hours.end)),
                        ],
                    ),
                ],
            )
            .describe(window.description()),
        );
    }
}

fn declare_policy_rules(kb: &mut KnowledgeBase, policy: &PolicyConfig) {
    kb.add_rule(
        Rule::new(
            clause("prioritize", vec![v("t")]),
            vec![
                clause("task-status", vec![v("t"), Term::sym(PENDING)]),
                clause("task-align", vec![v("t"), v("score")]),
                clause("ge", vec![v("score"), Term::num(policy.prioritize_threshold)]),
            ],
        )
        .describe("Pending and highly aligned"),
    );

    kb.add_rule(
        Rule::new(
            clause("avoid", vec![v("t")]),
            vec![clause("task-cat", vec![v("t"), Term::sym("distraction")])],
        )
        .describe("Avoid distraction tasks"),
    );

    kb.add_rule(
        Rule::new(
            clause("goal-critical", vec![v("t")]),
            vec![
                clause("task-goal", vec![v("t"), v("g")]),
                clause("goal-target", vec![v("g"), v("target")]),
                clause("goal-progress", vec![v("g"), v("cur")]),
                clause("num", vec![v("target")]),
                clause("num", vec![v("cur")]),
                clause("lt-half", vec![v("cur"), v("target")]),
            ],
        )
        .describe("Tasks linked to lagging goals"),
    );

    let morning = FocusWindow::MorningFocus.tag();
    kb.add_rule(
        Rule::new(
            clause("boost", vec![v("t"), Term::num(policy.morning_boost), Term::sym(morning)]),
            vec![
                clause("context", vec![Term::sym(morning)]),
                clause("prioritize", vec![v("t")]),
            ],
        )
        .describe("Morning boost for high-alignment tasks"),
    );

    let midday = FocusWindow::MiddayDeep.tag();
    kb.add_rule(
        Rule::new(
            clause("boost", vec![v("t"), Term::num(policy.midday_boost), Term::sym(midday)]),
            vec![
                clause("context", vec![Term::sym(midday)]),
                clause("goal-critical", vec![v("t")]),
            ],
        )
        .describe("Midday boost for goal-critical tasks"),
    );

    let admin = FocusWindow::AdminWindow.tag();
    kb.add_rule(
        Rule::new(
            clause("penalty", vec![v("t"), Term::num(policy.admin_penalty), Term::sym(admin)]),
            vec![
                clause("context", vec![Term::sym(admin)]),
                clause("prioritize", vec![v("t")]),
            ],
        )
        .describe("Admin window penalty for deep work"),
    );
}
