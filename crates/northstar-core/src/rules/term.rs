//! Terms and clauses.
//!
//! Terms are flat: a clause argument is always an atom or a variable, never
//! a nested structure. That keeps unification a per-argument comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Sigil that marks a variable name.
pub const VAR_SIGIL: char = '?';

/// A single argument inside a fact, rule or query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
    /// Atomic identifier, e.g. a status value or tag.
    #[serde(rename = "sym")]
    Symbol(String),
    /// Integer used for ids, scores, hours and thresholds.
    #[serde(rename = "num")]
    Number(i64),
    /// Free text such as titles, ISO dates or mission statements.
    #[serde(rename = "str")]
    Text(String),
    Bool(bool),
    Nil,
    /// Placeholder bound during unification. Never stored in a fact.
    Var(String),
}

impl Term {
    /// Build a variable, adding the `?` sigil when missing.
    pub fn var(name: &str) -> Self {
        Term::Var(var_name(name))
    }

    pub fn sym(value: impl Into<String>) -> Self {
        Term::Symbol(value.into())
    }

    pub fn num(value: i64) -> Self {
        Term::Number(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Term::Text(value.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Term::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Term::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Normalize a variable name so that `t` and `?t` refer to the same variable.
pub fn var_name(name: &str) -> String {
    if name.starts_with(VAR_SIGIL) {
        name.to_string()
    } else {
        format!("{VAR_SIGIL}{name}")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Symbol(s) => write!(f, "{s}"),
            Term::Number(n) => write!(f, "{n}"),
            Term::Text(s) => write!(f, "{s:?}"),
            Term::Bool(b) => write!(f, "{b}"),
            Term::Nil => write!(f, "nil"),
            Term::Var(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for Term {
    type Err = ParseError;

    /// Parse one token: `?x` is a variable, an integer is a number,
    /// a double-quoted token is text, `true`/`false`/`nil` are literals,
    /// anything else is a symbol.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ParseError::EmptyTerm);
        }
        if let Some(name) = token.strip_prefix(VAR_SIGIL) {
            if name.is_empty() {
                return Err(ParseError::InvalidVariable(token.to_string()));
            }
            return Ok(Term::Var(token.to_string()));
        }
        if token.starts_with('"') {
            let inner = token
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .ok_or_else(|| ParseError::UnterminatedText(token.to_string()))?;
            return Ok(Term::Text(inner.to_string()));
        }
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Term::Number(n));
        }
        Ok(match token {
            "true" => Term::Bool(true),
            "false" => Term::Bool(false),
            "nil" => Term::Nil,
            other => Term::Symbol(other.to_string()),
        })
    }
}

/// A predicate applied to a list of terms.
///
/// Used for stored facts, rule heads and bodies, and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub predicate: String,
    pub args: Vec<Term>,
}

/// A fact is a clause without variables.
pub type Fact = Clause;

impl Clause {
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// True when no argument is a variable.
    pub fn is_ground(&self) -> bool {
        !self.args.iter().any(Term::is_var)
    }

    /// Variable names in first-occurrence order, without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for arg in &self.args {
            if let Term::Var(name) = arg {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Shorthand for building a clause.
pub fn clause(predicate: &str, args: Vec<Term>) -> Clause {
    Clause::new(predicate, args)
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for Clause {
    type Err = ParseError;

    /// Parse `pred arg arg ...`, optionally wrapped in parentheses.
    /// Quoted text may contain spaces.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut body = input.trim();
        if let Some(inner) = body.strip_prefix('(') {
            body = inner
                .strip_suffix(')')
                .ok_or_else(|| ParseError::UnbalancedParens(input.to_string()))?
                .trim();
        }

        let tokens = tokenize(body)?;
        let mut iter = tokens.into_iter();
        let predicate = iter.next().ok_or(ParseError::MissingPredicate)?;
        if predicate.starts_with(VAR_SIGIL) || predicate.starts_with('"') {
            return Err(ParseError::InvalidPredicate(predicate));
        }

        let args = iter
            .map(|token| token.parse::<Term>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Clause::new(predicate, args))
    }
}

fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                current.push(ch);
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedText(current));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
