//! # Northstar Core Library
//!
//! This library provides the core logic behind Northstar's "what should I
//! work on now" suggestions for founders. The CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Rules**: a small knowledge base of facts and rules answered by
//!   unification and backward chaining, with native numeric predicates
//! - **Scheduler**: turns tasks, goals, the user profile and the clock into
//!   facts plus policy rules, then ranks pending tasks from query answers
//! - **Storage**: TOML configuration holding the scheduling policy
//!
//! ## Key Components
//!
//! - [`KnowledgeBase`]: fact/rule store and query engine
//! - [`MissionScheduler`]: knowledge base construction and ranking
//! - [`Config`]: application configuration management

pub mod error;
pub mod rules;
pub mod schedule;
pub mod scheduler;
pub mod storage;

pub use error::{ConfigError, CoreError, ValidationError};
pub use rules::{clause, Clause, KnowledgeBase, Rule, Substitution, Term};
pub use schedule::{
    AlignmentCategory, Chronotype, Goal, ScheduledSuggestion, SchedulerInput, Task, TitledSuggestion,
    UserContext,
};
pub use scheduler::{infer_suggestions, FocusWindow, HourWindow, MissionScheduler, PolicyConfig};
pub use storage::{Config, OutputConfig};
