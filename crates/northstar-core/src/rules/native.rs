//! Native predicates: relations answered at query time instead of from
//! stored facts.
//!
//! Numeric comparisons are bounded relations over small integer domains.
//! A native answers exactly what the equivalent materialized fact table
//! would: bound arguments outside the domain yield nothing, unbound
//! arguments enumerate the domain.

use std::fmt;
use std::ops::RangeInclusive;

use super::knowledge_base::KnowledgeBase;
use super::term::Term;

/// Upper bound of the general numeric domain (`num`, `le`, `ge`, `lt-half`).
pub const NUMBER_MAX: i64 = 200;

/// Upper bound of the hour domain (`hour-domain`, `range`).
pub const HOUR_MAX: i64 = 23;

/// A relation the knowledge base can answer without stored facts.
pub trait NativePredicate: Send + Sync + fmt::Debug {
    /// Predicate name this native answers for.
    fn name(&self) -> &str;

    /// Number of arguments.
    fn arity(&self) -> usize;

    /// Ground tuples consistent with `args`.
    ///
    /// `args` are already resolved against the current bindings, so each
    /// is either an atom or an unbound variable.
    fn answer(&self, args: &[Term]) -> Vec<Vec<Term>>;
}

/// A numeric relation with a bounded domain per argument.
pub struct NumericRelation {
    name: &'static str,
    domains: Vec<RangeInclusive<i64>>,
    holds: fn(&[i64]) -> bool,
}

impl NumericRelation {
    pub fn new(name: &'static str, domains: Vec<RangeInclusive<i64>>, holds: fn(&[i64]) -> bool) -> Self {
        Self { name, domains, holds }
    }

    fn candidates(arg: &Term, domain: &RangeInclusive<i64>) -> Vec<i64> {
        match arg {
            Term::Number(n) if domain.contains(n) => vec![*n],
            Term::Var(_) => domain.clone().collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for NumericRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericRelation")
            .field("name", &self.name)
            .field("domains", &self.domains)
            .finish()
    }
}

impl NativePredicate for NumericRelation {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        self.domains.len()
    }

    fn answer(&self, args: &[Term]) -> Vec<Vec<Term>> {
        if args.len() != self.domains.len() {
            return Vec::new();
        }

        let mut tuples: Vec<Vec<i64>> = vec![Vec::new()];
        for (arg, domain) in args.iter().zip(&self.domains) {
            let values = Self::candidates(arg, domain);
            if values.is_empty() {
                return Vec::new();
            }
            tuples = tuples
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |v| {
                        let mut next = prefix.clone();
                        next.push(*v);
                        next
                    })
                })
                .collect();
        }

        tuples
            .into_iter()
            .filter(|tuple| (self.holds)(tuple))
            .map(|tuple| tuple.into_iter().map(Term::Number).collect())
            .collect()
    }
}

/// The comparison relations the scheduler's rules rely on.
pub fn numeric_predicates() -> Vec<NumericRelation> {
    vec![
        NumericRelation::new("num", vec![0..=NUMBER_MAX], |_| true),
        NumericRelation::new("le", vec![0..=NUMBER_MAX, 0..=NUMBER_MAX], |v| v[0] <= v[1]),
        NumericRelation::new("ge", vec![0..=NUMBER_MAX, 0..=NUMBER_MAX], |v| v[0] >= v[1]),
        // cur < floor(target / 2); a zero target never qualifies
        NumericRelation::new("lt-half", vec![0..=NUMBER_MAX, 1..=NUMBER_MAX], |v| v[0] < v[1] / 2),
        NumericRelation::new("hour-domain", vec![0..=HOUR_MAX], |_| true),
        NumericRelation::new("range", vec![0..=HOUR_MAX, 0..=HOUR_MAX], |v| v[0] <= v[1]),
    ]
}

/// Register every relation from [`numeric_predicates`].
pub fn install_numeric_predicates(kb: &mut KnowledgeBase) {
    for relation in numeric_predicates() {
        kb.register_native(Box::new(relation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::clause;

    fn relation(name: &str) -> NumericRelation {
        numeric_predicates()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    #[test]
    fn bound_arguments_are_checked() {
        let ge = relation("ge");
        assert_eq!(ge.answer(&[Term::num(85), Term::num(80)]).len(), 1);
        assert!(ge.answer(&[Term::num(70), Term::num(80)]).is_empty());
    }

    #[test]
    fn out_of_domain_values_have_no_answers() {
        let ge = relation("ge");
        assert!(ge.answer(&[Term::num(250), Term::num(80)]).is_empty());
        assert!(ge.answer(&[Term::num(-1), Term::num(0)]).is_empty());
        assert!(relation("hour-domain").answer(&[Term::num(24)]).is_empty());
    }

    #[test]
    fn non_numbers_have_no_answers() {
        assert!(relation("num").answer(&[Term::sym("ten")]).is_empty());
        assert!(relation("num").answer(&[Term::text("10")]).is_empty());
    }

    #[test]
    fn unbound_argument_enumerates_domain() {
        let le = relation("le");
        let answers = le.answer(&[Term::num(198), Term::var("y")]);
        assert_eq!(
            answers,
            vec![
                vec![Term::num(198), Term::num(198)],
                vec![Term::num(198), Term::num(199)],
                vec![Term::num(198), Term::num(200)],
            ]
        );
        assert_eq!(relation("hour-domain").answer(&[Term::var("h")]).len(), 24);
    }

    #[test]
    fn lt_half_uses_floor_of_half_target() {
        let lt_half = relation("lt-half");
        let holds = |cur, target| !lt_half.answer(&[Term::num(cur), Term::num(target)]).is_empty();
        assert!(holds(2, 10));
        assert!(holds(4, 10));
        assert!(!holds(5, 10));
        // floor(7 / 2) = 3
        assert!(holds(2, 7));
        assert!(!holds(3, 7));
        assert!(!holds(0, 1));
        assert!(!holds(0, 0));
    }

    #[test]
    fn arity_mismatch_has_no_answers() {
        assert!(relation("le").answer(&[Term::num(1)]).is_empty());
    }

    #[test]
    fn native_matches_materialized_table() {
        // Materialize `le` over a small slice of the domain and compare
        // against the native relation for every bound pair.
        let mut materialized = KnowledgeBase::new();
        for i in 0..=12 {
            for j in i..=12 {
                materialized.add_fact("le", vec![Term::num(i), Term::num(j)]);
            }
        }
        let mut native = KnowledgeBase::new();
        install_numeric_predicates(&mut native);

        for i in 0..=12 {
            for j in 0..=12 {
                let goal = clause("le", vec![Term::num(i), Term::num(j)]);
                assert_eq!(
                    materialized.query(&goal).len(),
                    native.query(&goal).len(),
                    "le({i}, {j})"
                );
            }
        }
    }
}
