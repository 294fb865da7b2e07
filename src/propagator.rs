//! Propagators: pure functions from input values to cell writes.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cell::CellId;
use crate::lattice::Value;

static NEXT_PROPAGATOR_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to an installed propagator. Minted once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropagatorId(u64);

impl PropagatorId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_PROPAGATOR_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// The handle's raw numeric id, useful for logging.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropagatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Propagator({})", self.0)
    }
}

/// What a propagator produces when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum PropagatorOutput {
    /// Nothing new to derive this firing (inputs incomplete, or the
    /// function chose not to write anything).
    Skip,
    /// Write each `value` into the corresponding output cell.
    Write(Vec<(CellId, Value)>),
}

/// A propagator's computation: given the current active values of its
/// input cells (in the same order as `inputs`), decide what to write.
///
/// Must be pure and side-effect-free; a panic inside is caught and treated
/// as [`PropagatorOutput::Skip`] (see [`Propagator::fire`]).
pub type PropagatorFn = Box<dyn Fn(&[Value]) -> PropagatorOutput + Send + Sync>;

/// An installed propagator: its id, wiring, informant, and function.
pub struct Propagator {
    id: PropagatorId,
    inputs: Vec<CellId>,
    outputs: Vec<CellId>,
    informant: String,
    f: PropagatorFn,
}

impl Propagator {
    pub(crate) fn new(
        id: PropagatorId,
        inputs: Vec<CellId>,
        outputs: Vec<CellId>,
        informant: String,
        f: PropagatorFn,
    ) -> Self {
        Self {
            id,
            inputs,
            outputs,
            informant,
            f,
        }
    }

    /// This propagator's handle.
    pub fn id(&self) -> PropagatorId {
        self.id
    }

    /// Cells this propagator reads.
    pub fn inputs(&self) -> &[CellId] {
        &self.inputs
    }

    /// Cells this propagator may write.
    pub fn outputs(&self) -> &[CellId] {
        &self.outputs
    }

    /// The informant string this propagator's derived beliefs are tagged
    /// with.
    pub fn informant(&self) -> &str {
        &self.informant
    }

    /// Run the propagator function against the given input values. A panic
    /// inside the function is caught and reported as `Skip` — a single
    /// misbehaving propagator must not take down the network.
    pub(crate) fn fire(&self, input_values: &[Value]) -> PropagatorOutput {
        let f = &self.f;
        match catch_unwind(AssertUnwindSafe(|| f(input_values))) {
            Ok(output) => output,
            Err(_) => {
                log::debug!("propagator {} panicked, treating as skip", self.id);
                PropagatorOutput::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_propagator(f: PropagatorFn) -> Propagator {
        Propagator::new(
            PropagatorId::fresh(),
            vec![CellId::fresh()],
            vec![CellId::fresh()],
            "test".into(),
            f,
        )
    }

    #[test]
    fn fire_returns_write() {
        let out_cell = CellId::fresh();
        let p = Propagator::new(
            PropagatorId::fresh(),
            vec![],
            vec![out_cell],
            "test".into(),
            Box::new(move |_| PropagatorOutput::Write(vec![(out_cell, Value::Number(1.0))])),
        );
        assert_eq!(
            p.fire(&[]),
            PropagatorOutput::Write(vec![(out_cell, Value::Number(1.0))])
        );
    }

    #[test]
    fn panicking_propagator_is_skipped() {
        let p = dummy_propagator(Box::new(|_| panic!("boom")));
        assert_eq!(p.fire(&[Value::Nothing]), PropagatorOutput::Skip);
    }
}
