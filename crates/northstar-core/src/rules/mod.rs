//! Small rule engine with unification and backward-chaining queries.
//!
//! A [`KnowledgeBase`] holds ground facts, derivation rules and native
//! predicates. Queries are answered by unifying the goal against facts,
//! then native predicates, then every rule whose head matches, solving
//! rule bodies left to right with bindings flowing forward.
//!
//! There is no cut: alternatives are OR-ed, body clauses are AND-ed.

mod knowledge_base;
mod native;
mod term;
mod unify;

pub use knowledge_base::{KnowledgeBase, QueryConfig, Rule};
pub use native::{
    install_numeric_predicates, numeric_predicates, NativePredicate, NumericRelation, HOUR_MAX,
    NUMBER_MAX,
};
pub use term::{clause, var_name, Clause, Fact, Term, VAR_SIGIL};
pub use unify::Substitution;

use thiserror::Error;

/// Errors from parsing the textual clause form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty term")]
    EmptyTerm,

    #[error("clause has no predicate")]
    MissingPredicate,

    #[error("invalid predicate name: {0}")]
    InvalidPredicate(String),

    #[error("invalid variable: {0}")]
    InvalidVariable(String),

    #[error("unterminated text literal: {0}")]
    UnterminatedText(String),

    #[error("unbalanced parentheses in: {0}")]
    UnbalancedParens(String),
}
