//! MRV-ordered chronological backtracking search over domains already
//! narrowed by AC-3.

use std::collections::BTreeMap;

use super::{Constraint, Domain};

/// Search for a full assignment satisfying every constraint, choosing the
/// variable with the fewest remaining candidates (minimum remaining
/// values) at each step.
pub fn backtrack(domains: BTreeMap<String, Domain>, constraints: &[&Constraint]) -> Option<BTreeMap<String, i64>> {
    let mut assignment = BTreeMap::new();
    search(domains, constraints, &mut assignment).then_some(assignment)
}

fn search(
    mut domains: BTreeMap<String, Domain>,
    constraints: &[&Constraint],
    assignment: &mut BTreeMap<String, i64>,
) -> bool {
    let unassigned = domains
        .keys()
        .filter(|k| !assignment.contains_key(*k))
        .min_by_key(|k| domains[*k].len())
        .cloned();

    let var = match unassigned {
        Some(v) => v,
        None => return true,
    };

    let candidates: Vec<i64> = domains[&var].iter().copied().collect();
    for value in candidates {
        assignment.insert(var.clone(), value);
        if consistent(&var, value, assignment, constraints) {
            let saved = domains.clone();
            domains.insert(var.clone(), Domain::from([value]));
            if search(domains.clone(), constraints, assignment) {
                return true;
            }
            domains = saved;
        }
        assignment.remove(&var);
    }
    false
}

fn consistent(var: &str, value: i64, assignment: &BTreeMap<String, i64>, constraints: &[&Constraint]) -> bool {
    constraints.iter().all(|c| {
        if !c.scope.iter().any(|s| s == var) {
            return true;
        }
        let values: Option<Vec<i64>> = c
            .scope
            .iter()
            .map(|s| {
                if s == var {
                    Some(value)
                } else {
                    assignment.get(s).copied()
                }
            })
            .collect();
        match values {
            Some(vs) => (c.predicate)(&vs),
            None => true,
        }
    })
}
