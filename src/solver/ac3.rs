//! AC-3 arc consistency.

use std::collections::{BTreeMap, VecDeque};

use super::{Constraint, Domain};

/// Narrow every domain in `domains` to arc consistency with respect to
/// `constraints`. Returns `false` if any domain becomes empty (the CSP is
/// unsatisfiable), `true` otherwise.
pub fn ac3(domains: &mut BTreeMap<String, Domain>, constraints: &[&Constraint]) -> bool {
    let mut arcs: VecDeque<(String, String)> = VecDeque::new();
    for c in constraints {
        let x = c.scope[0].clone();
        let y = c.scope[1].clone();
        arcs.push_back((x.clone(), y.clone()));
        arcs.push_back((y, x));
    }

    while let Some((x, y)) = arcs.pop_front() {
        if revise(domains, constraints, &x, &y) {
            if domains.get(&x).map(|d| d.is_empty()).unwrap_or(false) {
                return false;
            }
            for c in constraints {
                if c.scope.contains(&x) && !c.scope.contains(&y) {
                    let other = if c.scope[0] == x { c.scope[1].clone() } else { c.scope[0].clone() };
                    if other != x {
                        arcs.push_back((other, x.clone()));
                    }
                }
            }
        }
    }
    true
}

/// Remove every value from `x`'s domain with no supporting value left in
/// `y`'s domain under the constraints between them. Returns whether `x`'s
/// domain shrank.
fn revise(domains: &mut BTreeMap<String, Domain>, constraints: &[&Constraint], x: &str, y: &str) -> bool {
    let arc_constraints: Vec<&&Constraint> = constraints
        .iter()
        .filter(|c| c.scope == [x.to_string(), y.to_string()] || c.scope == [y.to_string(), x.to_string()])
        .collect();
    if arc_constraints.is_empty() {
        return false;
    }

    let x_domain = match domains.get(x) {
        Some(d) => d.clone(),
        None => return false,
    };
    let y_domain = match domains.get(y) {
        Some(d) => d.clone(),
        None => return false,
    };

    let mut revised = false;
    let mut keep = Domain::new();
    for &vx in &x_domain {
        let supported = y_domain.iter().any(|&vy| {
            arc_constraints.iter().all(|c| {
                if c.scope[0] == x {
                    (c.predicate)(&[vx, vy])
                } else {
                    (c.predicate)(&[vy, vx])
                }
            })
        });
        if supported {
            keep.insert(vx);
        } else {
            revised = true;
        }
    }
    if revised {
        domains.insert(x.to_string(), keep);
    }
    revised
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn revise_prunes_unsupported_values() {
        let mut domains = BTreeMap::new();
        domains.insert("x".to_string(), BTreeSet::from([1, 2, 3]));
        domains.insert("y".to_string(), BTreeSet::from([3]));
        let constraints = vec![Constraint::binary("x", "y", |x, y| x < y)];
        let refs: Vec<&Constraint> = constraints.iter().collect();
        assert!(ac3(&mut domains, &refs));
        assert_eq!(domains["x"], BTreeSet::from([1, 2]));
    }

    #[test]
    fn ac3_detects_empty_domain() {
        let mut domains = BTreeMap::new();
        domains.insert("x".to_string(), BTreeSet::from([5]));
        domains.insert("y".to_string(), BTreeSet::from([1]));
        let constraints = vec![Constraint::binary("x", "y", |x, y| x < y)];
        let refs: Vec<&Constraint> = constraints.iter().collect();
        assert!(!ac3(&mut domains, &refs));
    }
}
