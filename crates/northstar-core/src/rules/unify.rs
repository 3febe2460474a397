//! Unification over flat terms.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::term::{var_name, Clause, Term};

/// Working bindings during a proof, keyed by variable name.
pub(crate) type Bindings = HashMap<String, Term>;

/// Follow variable bindings until reaching an unbound variable or an atom.
pub(crate) fn resolve(term: &Term, bindings: &Bindings) -> Term {
    let mut current = term;
    while let Term::Var(name) = current {
        match bindings.get(name) {
            Some(next) => current = next,
            None => break,
        }
    }
    current.clone()
}

/// Unify two terms, extending `bindings` in place.
///
/// Terms are flat, so no occurs check is needed.
pub(crate) fn unify_terms(a: &Term, b: &Term, bindings: &mut Bindings) -> bool {
    let left = resolve(a, bindings);
    let right = resolve(b, bindings);

    match (&left, &right) {
        (Term::Var(x), Term::Var(y)) if x == y => true,
        (Term::Var(x), _) => {
            bindings.insert(x.clone(), right);
            true
        }
        (_, Term::Var(y)) => {
            bindings.insert(y.clone(), left);
            true
        }
        _ => left == right,
    }
}

/// Unify a goal against another clause argument by argument.
///
/// Returns the extended bindings, or `None` when predicate, arity or any
/// argument disagrees. The input bindings are left untouched.
pub(crate) fn unify_clauses(goal: &Clause, target: &Clause, bindings: &Bindings) -> Option<Bindings> {
    if goal.predicate != target.predicate || goal.args.len() != target.args.len() {
        return None;
    }
    let mut next = bindings.clone();
    for (a, b) in goal.args.iter().zip(&target.args) {
        if !unify_terms(a, b, &mut next) {
            return None;
        }
    }
    Some(next)
}

/// Unify a goal's arguments with a ground tuple produced by a native predicate.
pub(crate) fn unify_args(args: &[Term], values: &[Term], bindings: &Bindings) -> Option<Bindings> {
    if args.len() != values.len() {
        return None;
    }
    let mut next = bindings.clone();
    for (a, v) in args.iter().zip(values) {
        if !unify_terms(a, v, &mut next) {
            return None;
        }
    }
    Some(next)
}

/// One answer to a query: the query's variables and what they resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Substitution(BTreeMap<String, Term>);

impl Substitution {
    pub(crate) fn project(vars: &[&str], bindings: &Bindings) -> Self {
        let map = vars
            .iter()
            .map(|name| (name.to_string(), resolve(&Term::Var(name.to_string()), bindings)))
            .collect();
        Self(map)
    }

    /// Term bound to `name` (`t` and `?t` are equivalent).
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(&var_name(name))
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Term::as_number)
    }

    pub fn symbol(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Term::as_symbol)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Term::as_text)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::clause;

    #[test]
    fn resolve_follows_chains() {
        let mut b = Bindings::new();
        b.insert("?a".into(), Term::var("b"));
        b.insert("?b".into(), Term::num(3));
        assert_eq!(resolve(&Term::var("a"), &b), Term::num(3));
        assert_eq!(resolve(&Term::var("c"), &b), Term::var("c"));
    }

    #[test]
    fn unify_binds_variable_to_atom() {
        let mut b = Bindings::new();
        assert!(unify_terms(&Term::var("x"), &Term::sym("pending"), &mut b));
        assert_eq!(b.get("?x"), Some(&Term::sym("pending")));
    }

    #[test]
    fn unify_respects_existing_binding() {
        let mut b = Bindings::new();
        b.insert("?x".into(), Term::num(1));
        assert!(!unify_terms(&Term::var("x"), &Term::num(2), &mut b));
        assert!(unify_terms(&Term::var("x"), &Term::num(1), &mut b));
    }

    #[test]
    fn unify_distinguishes_kinds() {
        let mut b = Bindings::new();
        assert!(!unify_terms(&Term::sym("1"), &Term::num(1), &mut b));
        assert!(!unify_terms(&Term::sym("a"), &Term::text("a"), &mut b));
    }

    #[test]
    fn unify_same_variable_is_noop() {
        let mut b = Bindings::new();
        assert!(unify_terms(&Term::var("x"), &Term::var("x"), &mut b));
        assert!(b.is_empty());
    }

    #[test]
    fn repeated_variable_must_match_consistently() {
        let goal = clause("pair", vec![Term::var("x"), Term::var("x")]);
        let same = clause("pair", vec![Term::num(4), Term::num(4)]);
        let diff = clause("pair", vec![Term::num(4), Term::num(5)]);
        assert!(unify_clauses(&goal, &same, &Bindings::new()).is_some());
        assert!(unify_clauses(&goal, &diff, &Bindings::new()).is_none());
    }

    #[test]
    fn clause_unification_checks_predicate_and_arity() {
        let goal = clause("task", vec![Term::var("t")]);
        assert!(unify_clauses(&goal, &clause("goal", vec![Term::num(1)]), &Bindings::new()).is_none());
        assert!(unify_clauses(
            &goal,
            &clause("task", vec![Term::num(1), Term::text("x")]),
            &Bindings::new()
        )
        .is_none());
    }

    #[test]
    fn substitution_accessors_accept_either_name_form() {
        let mut b = Bindings::new();
        b.insert("?t".into(), Term::num(9));
        b.insert("?tag".into(), Term::sym("morning-focus"));
        let sub = Substitution::project(&["?t", "?tag"], &b);
        assert_eq!(sub.number("t"), Some(9));
        assert_eq!(sub.number("?t"), Some(9));
        assert_eq!(sub.symbol("tag"), Some("morning-focus"));
        assert_eq!(sub.text("tag"), None);
        assert_eq!(sub.len(), 2);
    }
}
