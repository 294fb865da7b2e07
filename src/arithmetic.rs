//! Bidirectional arithmetic constraints built from propagator triples.
//!
//! Each constraint installs several propagators so that supplying any two
//! of its cells derives the third — the classic adder/multiplier
//! constraint-network idiom.

use crate::cell::CellId;
use crate::errors::Result;
use crate::lattice::Value;
use crate::network::Network;
use crate::propagator::PropagatorOutput;

/// Install `left + right = sum`, in all three directions:
/// `sum <- left + right`, `left <- sum - right`, `right <- sum - left`.
pub fn adder(net: &Network, left: CellId, right: CellId, sum: CellId) -> Result<()> {
    net.create_propagator(
        &[left, right],
        &[sum],
        "adder:sum",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(l), Value::Number(r)) => {
                PropagatorOutput::Write(vec![(sum, Value::Number(l + r))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(sum, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[sum, right],
        &[left],
        "adder:left",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(s), Value::Number(r)) => {
                PropagatorOutput::Write(vec![(left, Value::Number(s - r))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(left, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[sum, left],
        &[right],
        "adder:right",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(s), Value::Number(l)) => {
                PropagatorOutput::Write(vec![(right, Value::Number(s - l))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(right, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    Ok(())
}

/// Install `left * right = product`, in all three directions. The inverse
/// directions skip (rather than divide) when the known factor is zero,
/// since a zero factor doesn't determine the other one.
pub fn multiplier(net: &Network, left: CellId, right: CellId, product: CellId) -> Result<()> {
    net.create_propagator(
        &[left, right],
        &[product],
        "multiplier:product",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(l), Value::Number(r)) => {
                PropagatorOutput::Write(vec![(product, Value::Number(l * r))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(product, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[product, right],
        &[left],
        "multiplier:left",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(p), Value::Number(r)) if *r != 0.0 => {
                PropagatorOutput::Write(vec![(left, Value::Number(p / r))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(left, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[product, left],
        &[right],
        "multiplier:right",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(p), Value::Number(l)) if *l != 0.0 => {
                PropagatorOutput::Write(vec![(right, Value::Number(p / l))])
            }
            (Value::Contradiction, _) | (_, Value::Contradiction) => {
                PropagatorOutput::Write(vec![(right, Value::Contradiction)])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;
    Ok(())
}
