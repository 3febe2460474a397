//! Integration tests for mission-aligned task suggestions.
//!
//! These run full requests through knowledge base construction and ranking.

use chrono::{NaiveDate, NaiveDateTime};
use northstar_core::{infer_suggestions, Goal, SchedulerInput, Task, UserContext};
use proptest::prelude::*;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn request(hour: u32, tasks: Vec<Task>, goals: Vec<Goal>) -> SchedulerInput {
    SchedulerInput::new(UserContext::new("founder-1"))
        .with_tasks(tasks)
        .with_goals(goals)
        .at(at(hour))
}

fn task(id: i64, title: &str, score: Option<i64>) -> Task {
    let mut t = Task::new(id, title);
    t.alignment_score = score;
    t.completed = Some(false);
    t
}

#[test]
fn test_morning_boost_for_aligned_task() {
    let out = infer_suggestions(&request(9, vec![task(1, "Draft pitch", Some(85))], vec![]));

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].task_id, 1);
    assert_eq!(out[0].score, 95);
    assert_eq!(out[0].tags, vec!["morning-focus"]);
    assert_eq!(out[0].reason, "alignment, +10 morning-focus");
}

#[test]
fn test_distraction_is_never_suggested() {
    let mut scroll = task(2, "Scroll socials", None);
    scroll.alignment_category = Some("distraction".to_string());

    for hour in 0..24 {
        let out = infer_suggestions(&request(hour, vec![scroll.clone()], vec![]));
        assert!(out.iter().all(|s| s.task_id != 2), "hour {hour}");
    }
}

#[test]
fn test_midday_goal_critical_compounds() {
    let mut ship = task(3, "Ship MVP", Some(40));
    ship.goal_id = Some(7);
    let mut goal = Goal::new(7, "Launch");
    goal.current_value = Some(2);
    goal.target_value = Some(10);

    let out = infer_suggestions(&request(13, vec![ship], vec![goal]));

    assert_eq!(out.len(), 1);
    assert!(out[0].tags.contains(&"goal-critical".to_string()));
    assert_eq!(out[0].tags, vec!["midday-deep", "goal-critical"]);
    assert_eq!(out[0].score, 57);
    assert_eq!(out[0].reason, "alignment, +12 midday-deep, goal-critical");
}

#[test]
fn test_completed_tasks_are_excluded() {
    let mut done = task(4, "Old work", Some(99));
    done.completed = Some(true);
    let out = infer_suggestions(&request(9, vec![done, task(5, "New work", Some(10))], vec![]));

    let ids: Vec<i64> = out.iter().map(|s| s.task_id).collect();
    assert_eq!(ids, vec![5]);
}

#[test]
fn test_untitled_tasks_are_excluded() {
    let out = infer_suggestions(&request(9, vec![task(6, "", Some(99))], vec![]));
    assert!(out.is_empty());
}

#[test]
fn test_empty_request_yields_nothing() {
    assert!(infer_suggestions(&request(9, vec![], vec![])).is_empty());
}

#[test]
fn test_huge_alignment_score_saturates() {
    let mut huge = task(1, "Moonshot", Some(i64::MAX));
    huge.goal_id = Some(7);
    let mut goal = Goal::new(7, "Launch");
    goal.current_value = Some(1);
    goal.target_value = Some(10);

    let out = infer_suggestions(&request(9, vec![huge], vec![goal]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].score, i64::MAX);
    assert_eq!(out[0].tags, vec!["goal-critical"]);

    let json = r#"{
        "user": { "userId": "founder-1" },
        "tasks": [ { "id": 1, "title": "Moonshot", "alignment_score": 9223372036854775807, "goal_id": 7, "completed": false } ],
        "goals": [ { "id": 7, "title": "Launch", "current_value": 1, "target_value": 10 } ],
        "now": "2025-01-06T09:00:00"
    }"#;
    let out = infer_suggestions(&SchedulerInput::from_json(json).unwrap());
    assert_eq!(out[0].score, i64::MAX);
}

#[test]
fn test_goal_without_progress_is_not_critical() {
    let mut linked = task(8, "Hire", Some(30));
    linked.goal_id = Some(9);
    let mut goal = Goal::new(9, "Team");
    goal.target_value = Some(4);

    let out = infer_suggestions(&request(13, vec![linked], vec![goal]));
    assert_eq!(out[0].score, 30);
    assert!(out[0].tags.is_empty());
}

#[test]
fn test_snapshot_json_end_to_end() {
    let json = r#"{
        "user": { "userId": "founder-1", "mission": "Make scheduling effortless" },
        "tasks": [
            { "id": 1, "title": "Draft pitch", "alignment_score": 85, "completed": false },
            { "id": 2, "title": "Scroll socials", "alignment_category": "distraction", "completed": false },
            { "id": 3, "title": "Ship MVP", "alignment_score": 40, "goal_id": 7, "completed": false },
            { "id": 4, "title": "Invoice", "alignment_score": 20, "alignment_category": "Admin", "completed": true }
        ],
        "goals": [ { "id": 7, "title": "Launch", "current_value": 2, "target_value": 10 } ],
        "now": "2025-01-06T09:30:00"
    }"#;
    let input = SchedulerInput::from_json(json).unwrap();
    let out = infer_suggestions(&input);

    let summary: Vec<(i64, i64)> = out.iter().map(|s| (s.task_id, s.score)).collect();
    assert_eq!(summary, vec![(1, 95), (3, 45)]);
}

proptest! {
    #[test]
    fn prop_identical_input_gives_identical_output(
        scores in proptest::collection::vec(0i64..=100, 0..8),
        hour in 0u32..24,
    ) {
        let tasks: Vec<Task> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| task(i as i64 + 1, "Work", Some(*s)))
            .collect();
        let input = request(hour, tasks, vec![]);
        prop_assert_eq!(infer_suggestions(&input), infer_suggestions(&input));
    }

    #[test]
    fn prop_morning_boost_for_every_prioritized_task(
        scores in proptest::collection::vec(80i64..=200, 1..6),
        hour in 6u32..=11,
    ) {
        let tasks: Vec<Task> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| task(i as i64 + 1, "Deep work", Some(*s)))
            .collect();
        let out = infer_suggestions(&request(hour, tasks, vec![]));
        prop_assert_eq!(out.len(), scores.len());
        for s in &out {
            let base = scores[(s.task_id - 1) as usize];
            prop_assert_eq!(s.score, base + 10);
            prop_assert!(s.reason.contains("+10 morning-focus"));
        }
    }

    #[test]
    fn prop_goal_critical_when_progress_below_half(
        target in 1i64..=200,
        cur_fraction in 0.0f64..1.0,
        hour in 0u32..24,
    ) {
        let cur = (cur_fraction * target as f64) as i64;
        let mut linked = task(1, "Push goal", Some(10));
        linked.goal_id = Some(1);
        let mut goal = Goal::new(1, "Goal");
        goal.current_value = Some(cur);
        goal.target_value = Some(target);

        let out = infer_suggestions(&request(hour, vec![linked], vec![goal]));
        let critical = out[0].tags.iter().any(|t| t == "goal-critical");
        prop_assert_eq!(critical, cur < target / 2);
        if critical {
            prop_assert!(out[0].reason.contains("goal-critical"));
        }
    }

    #[test]
    fn prop_distractions_and_completed_never_appear(
        flags in proptest::collection::vec((any::<bool>(), any::<bool>(), 0i64..=100), 0..10),
        hour in 0u32..24,
    ) {
        let tasks: Vec<Task> = flags
            .iter()
            .enumerate()
            .map(|(i, (distraction, completed, score))| {
                let mut t = task(i as i64 + 1, "Item", Some(*score));
                if *distraction {
                    t.alignment_category = Some("distraction".to_string());
                }
                t.completed = Some(*completed);
                t
            })
            .collect();
        let out = infer_suggestions(&request(hour, tasks, vec![]));
        for s in &out {
            let (distraction, completed, _) = flags[(s.task_id - 1) as usize];
            prop_assert!(!distraction && !completed);
        }
        let expected = flags.iter().filter(|(d, c, _)| !d && !c).count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn prop_output_sorted_descending(
        scores in proptest::collection::vec(0i64..=150, 0..10),
        hour in 0u32..24,
    ) {
        let tasks: Vec<Task> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| task(i as i64 + 1, "Item", Some(*s)))
            .collect();
        let out = infer_suggestions(&request(hour, tasks, vec![]));
        prop_assert!(out.windows(2).all(|w| w[0].score > w[1].score
            || (w[0].score == w[1].score && w[0].task_id < w[1].task_id)));
    }
}

#[test]
fn test_crossing_threshold_increases_score() {
    let low = infer_suggestions(&request(9, vec![task(1, "Pitch", Some(70))], vec![]));
    let high = infer_suggestions(&request(9, vec![task(1, "Pitch", Some(85))], vec![]));
    assert_eq!(low[0].score, 70);
    assert_eq!(high[0].score, 95);
    assert!(high[0].score > low[0].score);
}
