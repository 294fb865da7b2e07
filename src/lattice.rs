//! Value algebra shared by belief cells.
//!
//! A cell's *lattice* decides what `merge` and `equal` mean for its values.
//! Rather than a generic `Lattice` trait per cell (which would force every
//! cell in a [`Network`](crate::network::Network) to share one concrete
//! value type), cells carry a [`LatticeKind`] tag and dispatch through a
//! single [`Value`] enum — the systems-language-friendly choice the design
//! notes call for.

use std::collections::BTreeSet;

/// Relative tolerance used to compare two numbers for equality.
///
/// `|a - b| <= EPSILON * max(|a|, |b|)`.
pub const EPSILON: f64 = 1e-10;

/// Which lattice a cell's values are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeKind {
    /// Numbers merged under a relative-epsilon equality; `nothing` is the
    /// bottom, `contradiction` the top.
    Number,
    /// Finite integer sets merged under intersection; used by the solver's
    /// domains. An empty intersection is reported as `contradiction`.
    Set,
}

/// A value held by a belief, or the result of reading a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No information — the lattice's bottom for the Number lattice, and
    /// the "no active belief" projection every cell can report regardless
    /// of its lattice kind.
    Nothing,
    /// A number, for Number-lattice cells.
    Number(f64),
    /// A finite set of integers, for Set-lattice cells (CSP domains).
    Set(BTreeSet<i64>),
    /// The lattice's top: two active beliefs disagree.
    Contradiction,
}

impl Value {
    /// Does this value's shape fit the given lattice kind?
    ///
    /// `Nothing` and `Contradiction` are universal; `Number`/`Set` must
    /// match their cell's configured kind. Mismatches are rejected at
    /// `add_content` time (see the kernel's Open Questions resolution).
    pub fn matches_kind(&self, kind: LatticeKind) -> bool {
        match (self, kind) {
            (Value::Nothing, _) | (Value::Contradiction, _) => true,
            (Value::Number(_), LatticeKind::Number) => true,
            (Value::Set(_), LatticeKind::Set) => true,
            _ => false,
        }
    }
}

/// `bottom()` for the given lattice kind.
pub fn bottom(kind: LatticeKind) -> Value {
    match kind {
        LatticeKind::Number => Value::Nothing,
        // The set lattice's merge is intersection; its bottom (the empty
        // set) denotes an infeasible domain, which this kernel reports as
        // `contradiction` rather than inventing a distinct "empty" value.
        LatticeKind::Set => Value::Contradiction,
    }
}

/// `top()`, shared by every lattice kind.
pub fn top() -> Value {
    Value::Contradiction
}

/// Least-upper-bound merge for the given lattice kind.
///
/// For the Number lattice this is the usual epsilon-tolerant merge. For
/// the Set lattice `merge` is intersection (a greatest-lower-bound,
/// reused here because CSP domains only ever shrink).
pub fn merge(kind: LatticeKind, a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Nothing, x) | (x, Value::Nothing) => x.clone(),
        (Value::Contradiction, _) | (_, Value::Contradiction) => Value::Contradiction,
        (Value::Number(x), Value::Number(y)) if kind == LatticeKind::Number => {
            if numbers_close(*x, *y) {
                Value::Number(*x)
            } else {
                Value::Contradiction
            }
        }
        (Value::Set(x), Value::Set(y)) if kind == LatticeKind::Set => {
            let intersection: BTreeSet<i64> = x.intersection(y).copied().collect();
            if intersection.is_empty() {
                Value::Contradiction
            } else {
                Value::Set(intersection)
            }
        }
        _ => Value::Contradiction,
    }
}

/// Equality compatible with `merge`: `equal(a, b) => merge(a, b) == a`.
pub fn equal(kind: LatticeKind, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nothing, Value::Nothing) => true,
        (Value::Contradiction, Value::Contradiction) => true,
        (Value::Number(x), Value::Number(y)) if kind == LatticeKind::Number => numbers_close(*x, *y),
        (Value::Set(x), Value::Set(y)) if kind == LatticeKind::Set => x == y,
        _ => false,
    }
}

fn numbers_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_merge_identity_with_nothing() {
        assert_eq!(
            merge(LatticeKind::Number, &Value::Nothing, &Value::Number(3.0)),
            Value::Number(3.0)
        );
    }

    #[test]
    fn number_merge_equal_numbers() {
        assert_eq!(
            merge(LatticeKind::Number, &Value::Number(40.0), &Value::Number(40.0)),
            Value::Number(40.0)
        );
    }

    #[test]
    fn number_merge_unequal_is_contradiction() {
        assert_eq!(
            merge(LatticeKind::Number, &Value::Number(40.0), &Value::Number(65.0)),
            Value::Contradiction
        );
    }

    #[test]
    fn merge_is_commutative_for_numbers() {
        let a = Value::Number(1.0);
        let b = Value::Number(2.0);
        assert_eq!(
            merge(LatticeKind::Number, &a, &b),
            merge(LatticeKind::Number, &b, &a)
        );
    }

    #[test]
    fn set_merge_is_intersection() {
        let a = Value::Set(BTreeSet::from([1, 2, 3]));
        let b = Value::Set(BTreeSet::from([2, 3, 4]));
        assert_eq!(
            merge(LatticeKind::Set, &a, &b),
            Value::Set(BTreeSet::from([2, 3]))
        );
    }

    #[test]
    fn set_merge_empty_intersection_is_contradiction() {
        let a = Value::Set(BTreeSet::from([1]));
        let b = Value::Set(BTreeSet::from([2]));
        assert_eq!(merge(LatticeKind::Set, &a, &b), Value::Contradiction);
    }

    #[test]
    fn equal_compatible_with_merge() {
        let a = Value::Number(1.0);
        let b = Value::Number(1.0 + 1e-12);
        assert!(equal(LatticeKind::Number, &a, &b));
        assert_eq!(merge(LatticeKind::Number, &a, &b), a);
    }
}
