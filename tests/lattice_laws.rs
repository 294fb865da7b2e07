//! Algebraic-law and kernel-invariant property tests, run across many
//! generated inputs with `proptest` rather than a handful of fixed cases.

use proptest::prelude::*;

use belief_net::lattice::{self, LatticeKind, Value};
use belief_net::{LatticeKind as Kind, Network, Value as V};

fn number_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nothing),
        Just(Value::Contradiction),
        (-1000.0..1000.0f64).prop_map(Value::Number),
    ]
}

proptest! {
    #[test]
    fn number_merge_is_commutative(a in number_value(), b in number_value()) {
        prop_assert_eq!(
            lattice::merge(LatticeKind::Number, &a, &b),
            lattice::merge(LatticeKind::Number, &b, &a)
        );
    }

    #[test]
    fn number_merge_is_idempotent(a in number_value()) {
        prop_assert_eq!(
            lattice::merge(LatticeKind::Number, &a, &a.clone()),
            a
        );
    }

    #[test]
    fn number_merge_is_associative(a in number_value(), b in number_value(), c in number_value()) {
        let left = lattice::merge(LatticeKind::Number, &lattice::merge(LatticeKind::Number, &a, &b), &c);
        let right = lattice::merge(LatticeKind::Number, &a, &lattice::merge(LatticeKind::Number, &b, &c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn equal_implies_merge_is_left_operand(a in number_value(), b in number_value()) {
        if lattice::equal(LatticeKind::Number, &a, &b) {
            prop_assert_eq!(lattice::merge(LatticeKind::Number, &a, &b), a);
        }
    }

    #[test]
    fn add_content_is_idempotent_under_repetition(value in -1000.0..1000.0f64, repeats in 1usize..5) {
        let net = Network::new();
        let cell = net.create_cell(Kind::Number);
        for _ in 0..repeats {
            net.add_content(cell, V::Number(value), "informant").unwrap();
        }
        prop_assert_eq!(net.read_cell(cell).unwrap(), V::Number(value));
    }

    #[test]
    fn retract_then_readd_same_informant_restores_value(a in -1000.0..1000.0f64) {
        let net = Network::new();
        let cell = net.create_cell(Kind::Number);
        net.add_content(cell, V::Number(a), "x").unwrap();
        net.retract_content(cell, "x").unwrap();
        prop_assert_eq!(net.read_cell(cell).unwrap(), V::Nothing);
        net.add_content(cell, V::Number(a), "x").unwrap();
        prop_assert_eq!(net.read_cell(cell).unwrap(), V::Number(a));
    }

    #[test]
    fn first_assumption_wins_the_insertion_order_tie(a in -1000.0..1000.0f64) {
        let net = Network::new();
        let cell = net.create_cell(Kind::Number);
        net.add_content(cell, V::Number(a), "first").unwrap();
        net.add_content(cell, V::Number(a), "second").unwrap();
        // Both informants assert the same value, so there's no
        // contradiction; retracting only the first must still leave the
        // cell believing `a`, since "second" independently supports it.
        net.retract_content(cell, "first").unwrap();
        prop_assert_eq!(net.read_cell(cell).unwrap(), V::Number(a));
    }
}
