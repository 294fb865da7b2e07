use thiserror::Error;

use crate::cell::CellId;

/// Errors that can occur calling into a [`Network`](crate::network::Network)
/// or [`solve`](crate::solver::solve).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A call referenced a cell handle that doesn't belong to this network.
    #[error("cell not found: {0}")]
    CellNotFound(CellId),

    /// A propagator was installed referencing one or more unknown cells.
    #[error("cells not found: {0:?}")]
    CellsNotFound(Vec<CellId>),

    /// `add_content`/`create_propagator` requires a non-empty informant.
    #[error("an informant string is required")]
    InformantRequired,

    /// `add_content` was given a value whose shape doesn't match the
    /// cell's configured lattice kind.
    #[error("value does not match cell {0}'s lattice kind")]
    LatticeMismatch(CellId),

    /// The solver exhausted the search space without finding an assignment
    /// that satisfies every constraint.
    #[error("no solution satisfies the given constraints")]
    NoSolution,
}

/// Convenient Result type alias for network and solver operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
