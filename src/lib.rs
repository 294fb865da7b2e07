//! # belief-net
//!
//! A belief-tracking constraint propagation kernel: a justification-based
//! truth maintenance system ([`jtms`]) underneath a dataflow [`network`] of
//! belief cells and propagators, plus a small finite-domain [`solver`] that
//! reuses the same lattice machinery for its domains.
//!
//! ## Quick start
//!
//! ```rust
//! use belief_net::{LatticeKind, Network, PropagatorOutput, Value};
//!
//! let net = Network::new();
//! let celsius = net.create_cell(LatticeKind::Number);
//! let fahrenheit = net.create_cell(LatticeKind::Number);
//!
//! net.create_propagator(
//!     &[celsius],
//!     &[fahrenheit],
//!     "c->f",
//!     Box::new(move |inputs| match &inputs[0] {
//!         Value::Number(c) => PropagatorOutput::Write(vec![
//!             (fahrenheit, Value::Number(c * 9.0 / 5.0 + 32.0)),
//!         ]),
//!         _ => PropagatorOutput::Skip,
//!     }),
//! )
//! .unwrap();
//!
//! net.add_content(celsius, Value::Number(100.0), "thermometer").unwrap();
//! assert_eq!(net.read_cell(fahrenheit).unwrap(), Value::Number(212.0));
//! ```
//!
//! ## Core components
//!
//! - [`Jtms`]: the truth maintenance kernel — nodes, justifications, label
//!   propagation, retraction.
//! - [`Network`]: cells and propagators layered on one JTMS, with quiescent
//!   (fixpoint-on-return) semantics.
//! - [`BeliefCell`]: an append-only bag of beliefs with a derived active
//!   value.
//! - [`arithmetic`]: bidirectional adder/multiplier constraints.
//! - [`solver`]: AC-3 + MRV backtracking over finite domains.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Bidirectional arithmetic constraints (adder, multiplier).
pub mod arithmetic;
/// Belief cells: append-only belief bags with a derived active value.
pub mod cell;
/// Error types and result handling.
pub mod errors;
/// The value lattice shared by belief cells.
pub mod lattice;
/// Justification-based truth maintenance system.
pub mod jtms;
/// The belief network: cells, propagators, and their shared JTMS.
pub mod network;
/// Propagators: pure functions from input values to cell writes.
pub mod propagator;
/// AC-3 + backtracking finite-domain solver.
pub mod solver;

// Re-export the common surface for easy access.
pub use cell::{Belief, BeliefCell, CellId};
pub use errors::{NetworkError, Result};
pub use jtms::{Jtms, Justification, Label, NodeId};
pub use lattice::{LatticeKind, Value};
pub use network::Network;
pub use propagator::{Propagator, PropagatorFn, PropagatorId, PropagatorOutput};
pub use solver::{solve, Constraint, Domain};
