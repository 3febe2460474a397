//! Fact and rule store with backward-chaining queries.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::native::NativePredicate;
use super::term::{Clause, Fact, Term};
use super::unify::{resolve, unify_args, unify_clauses, Bindings, Substitution};

/// A derivation rule: `head` holds whenever every clause in `body` holds
/// under one consistent set of bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub head: Clause,
    pub body: Vec<Clause>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Rule {
    pub fn new(head: Clause, body: Vec<Clause>) -> Self {
        Self {
            head,
            body,
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Copy of this rule with every variable suffixed by `#suffix`, so that
    /// one application cannot clash with the caller's variables or with
    /// another application of the same rule.
    fn renamed(&self, suffix: usize) -> Rule {
        let rename = |c: &Clause| Clause {
            predicate: c.predicate.clone(),
            args: c
                .args
                .iter()
                .map(|t| match t {
                    Term::Var(name) => Term::Var(format!("{name}#{suffix}")),
                    other => other.clone(),
                })
                .collect(),
        };
        Rule {
            head: rename(&self.head),
            body: self.body.iter().map(rename).collect(),
            description: None,
        }
    }
}

/// Query limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Maximum nesting of rule expansions in one derivation (default: 32).
    pub max_depth: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// A goal waiting to be proven, with the rule-nesting depth it came from.
#[derive(Debug, Clone)]
struct Pending {
    clause: Clause,
    depth: usize,
}

/// Per-query state: answer collection and rule renaming counter.
struct Search<'q> {
    vars: Vec<&'q str>,
    seen: HashSet<Substitution>,
    answers: Vec<Substitution>,
    renames: usize,
    cutoffs: usize,
}

impl Search<'_> {
    fn record(&mut self, bindings: &Bindings) {
        let answer = Substitution::project(&self.vars, bindings);
        if self.seen.insert(answer.clone()) {
            self.answers.push(answer);
        }
    }
}

/// Append-only store of facts, rules and native predicates.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    facts: Vec<Fact>,
    index: HashMap<String, Vec<usize>>,
    rules: Vec<Rule>,
    natives: HashMap<String, Box<dyn NativePredicate>>,
    config: QueryConfig,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append a ground fact. Duplicates are kept.
    ///
    /// A fact containing a variable is skipped with a warning.
    pub fn add_fact(&mut self, predicate: impl Into<String>, args: Vec<Term>) {
        let fact = Clause::new(predicate, args);
        if !fact.is_ground() {
            tracing::warn!(fact = %fact, "skipping non-ground fact");
            return;
        }
        self.index
            .entry(fact.predicate.clone())
            .or_default()
            .push(self.facts.len());
        self.facts.push(fact);
    }

    /// Append a rule. Rules are tried in insertion order.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Register a native predicate, replacing any previous one of the same name.
    pub fn register_native(&mut self, native: Box<dyn NativePredicate>) {
        self.natives.insert(native.name().to_string(), native);
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Names of registered native predicates, sorted.
    pub fn natives(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.natives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Stored facts for one predicate, in insertion order.
    pub fn facts_for<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Fact> + 'a {
        self.index
            .get(predicate)
            .into_iter()
            .flatten()
            .map(move |&i| &self.facts[i])
    }

    /// Every distinct binding of the goal's variables that the knowledge
    /// base can prove, in discovery order.
    ///
    /// An unsatisfiable goal yields an empty list. A ground goal that holds
    /// yields one empty substitution.
    pub fn query(&self, goal: &Clause) -> Vec<Substitution> {
        let mut search = Search {
            vars: goal.variables(),
            seen: HashSet::new(),
            answers: Vec::new(),
            renames: 0,
            cutoffs: 0,
        };
        let stack = vec![Pending {
            clause: goal.clone(),
            depth: 0,
        }];
        self.prove(&stack, &Bindings::new(), &mut search);

        if search.cutoffs > 0 {
            tracing::debug!(
                goal = %goal,
                cutoffs = search.cutoffs,
                max_depth = self.config.max_depth,
                "query hit rule depth limit"
            );
        }
        search.answers
    }

    /// Depth-first proof of a goal stack. The last element is proven next.
    fn prove(&self, stack: &[Pending], bindings: &Bindings, search: &mut Search<'_>) {
        let Some((goal, rest)) = stack.split_last() else {
            search.record(bindings);
            return;
        };

        for fact in self.facts_for(&goal.clause.predicate) {
            if let Some(next) = unify_clauses(&goal.clause, fact, bindings) {
                self.prove(rest, &next, search);
            }
        }

        if let Some(native) = self.natives.get(&goal.clause.predicate) {
            if native.arity() == goal.clause.arity() {
                let resolved: Vec<Term> = goal.clause.args.iter().map(|a| resolve(a, bindings)).collect();
                for tuple in native.answer(&resolved) {
                    if let Some(next) = unify_args(&resolved, &tuple, bindings) {
                        self.prove(rest, &next, search);
                    }
                }
            }
        }

        let candidates = self.rules.iter().filter(|r| {
            r.head.predicate == goal.clause.predicate && r.head.arity() == goal.clause.arity()
        });
        for rule in candidates {
            if goal.depth >= self.config.max_depth {
                search.cutoffs += 1;
                continue;
            }
            search.renames += 1;
            let applied = rule.renamed(search.renames);
            let Some(next) = unify_clauses(&goal.clause, &applied.head, bindings) else {
                continue;
            };

            let mut next_stack = rest.to_vec();
            next_stack.extend(applied.body.into_iter().rev().map(|clause| Pending {
                clause,
                depth: goal.depth + 1,
            }));
            self.prove(&next_stack, &next, search);
        }
    }
}
