//! A minimal finite-domain constraint solver: AC-3 arc consistency feeding
//! an MRV-ordered chronological backtracking search.
//!
//! This reuses the same [`Value::Set`](crate::lattice::Value::Set)
//! intersection lattice the belief network uses for its Set cells, so a
//! [`Domain`] is exactly what a Set-lattice cell's active value looks like.

mod ac3;
mod backtrack;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{NetworkError, Result};

pub use ac3::ac3;
pub use backtrack::backtrack;

/// A variable's remaining candidate values.
pub type Domain = BTreeSet<i64>;

/// A binary or unary constraint over named variables: `scope` lists the
/// variables it reads, `predicate` decides whether an assignment (given in
/// `scope` order) satisfies it.
pub struct Constraint {
    /// Variable names this constraint reads, in the order `predicate`
    /// expects them.
    pub scope: Vec<String>,
    /// Does this assignment (parallel to `scope`) satisfy the constraint?
    pub predicate: Box<dyn Fn(&[i64]) -> bool + Send + Sync>,
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint{:?}", self.scope)
    }
}

impl Constraint {
    /// A binary constraint between two named variables.
    pub fn binary(
        a: impl Into<String>,
        b: impl Into<String>,
        predicate: impl Fn(i64, i64) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            scope: vec![a.into(), b.into()],
            predicate: Box::new(move |xs| predicate(xs[0], xs[1])),
        }
    }

    /// A unary constraint on a single variable.
    pub fn unary(a: impl Into<String>, predicate: impl Fn(i64) -> bool + Send + Sync + 'static) -> Self {
        Self {
            scope: vec![a.into()],
            predicate: Box::new(move |xs| predicate(xs[0])),
        }
    }

    fn is_binary(&self) -> bool {
        self.scope.len() == 2
    }
}

/// Solve a finite-domain CSP: narrow every variable's domain with AC-3 and
/// unary pre-filtering, then search the rest with MRV-ordered backtracking.
///
/// Returns [`NetworkError::NoSolution`] if no assignment satisfies every
/// constraint.
pub fn solve(
    domains: BTreeMap<String, Domain>,
    constraints: Vec<Constraint>,
) -> Result<BTreeMap<String, i64>> {
    let mut domains = domains;

    for constraint in constraints.iter().filter(|c| c.scope.len() == 1) {
        let var = &constraint.scope[0];
        if let Some(domain) = domains.get_mut(var) {
            domain.retain(|v| (constraint.predicate)(&[*v]));
            if domain.is_empty() {
                return Err(NetworkError::NoSolution);
            }
        }
    }

    let binary: Vec<&Constraint> = constraints.iter().filter(|c| c.is_binary()).collect();
    if !ac3(&mut domains, &binary) {
        return Err(NetworkError::NoSolution);
    }

    backtrack(domains, &binary).ok_or(NetworkError::NoSolution)
}
