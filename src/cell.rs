//! Belief cells: append-only bags of beliefs with a derived active value.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::jtms::NodeId;
use crate::lattice::{self, LatticeKind, Value};

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a belief cell. Minted once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_CELL_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// The handle's raw numeric id, useful for logging.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

/// One entry in a cell's belief bag: a value, the JTMS node tracking whether
/// it's currently believed, and the informant that asserted it.
#[derive(Debug, Clone)]
pub struct Belief {
    /// The asserted or derived value.
    pub value: Value,
    /// The JTMS node whose label decides whether this belief is active.
    pub node: NodeId,
    /// Who asserted or derived this belief.
    pub informant: String,
}

/// A cell: a lattice kind and an append-only bag of beliefs.
///
/// Beliefs are never removed from the bag — retraction works by relabeling
/// their JTMS node to `Out`, at which point [`BeliefCell::active_value`]
/// stops counting them. This is what makes retraction reversible.
pub struct BeliefCell {
    id: CellId,
    kind: LatticeKind,
    beliefs: Vec<Belief>,
}

impl BeliefCell {
    pub(crate) fn new(id: CellId, kind: LatticeKind) -> Self {
        Self {
            id,
            kind,
            beliefs: Vec::new(),
        }
    }

    /// This cell's handle.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// This cell's configured lattice.
    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Append a belief to the bag. Does not touch the JTMS; callers create
    /// and label the node first, then record it here.
    pub(crate) fn push(&mut self, belief: Belief) {
        self.beliefs.push(belief);
    }

    /// All beliefs currently in the bag, in assertion order.
    pub fn beliefs(&self) -> &[Belief] {
        &self.beliefs
    }

    /// Find an existing belief by informant and value, used to reuse JTMS
    /// node identity across repeated derivations of the same fact (the
    /// kernel's invariant that a re-derivation doesn't mint a fresh node).
    pub(crate) fn find(&self, informant: &str, value: &Value) -> Option<&Belief> {
        self.beliefs
            .iter()
            .find(|b| b.informant == informant && lattice::equal(self.kind, &b.value, value))
    }

    /// The *active value*: the merge of every currently-`in` belief's value.
    ///
    /// This is a projection over live beliefs, not itself a lattice element
    /// cached on the cell — it can shrink non-monotonically as labels flip.
    pub fn active_value(&self, is_in: impl Fn(NodeId) -> bool) -> Value {
        let mut acc = lattice::bottom(self.kind);
        for belief in &self.beliefs {
            if is_in(belief.node) {
                acc = lattice::merge(self.kind, &acc, &belief.value);
            }
        }
        acc
    }
}
