//! The belief network: cells, propagators, and the JTMS that backs them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cell::{Belief, BeliefCell, CellId};
use crate::errors::{NetworkError, Result};
use crate::jtms::{Jtms, Justification, Label, NodeId};
use crate::lattice::{self, LatticeKind, Value};
use crate::propagator::{Propagator, PropagatorFn, PropagatorId, PropagatorOutput};

struct NetworkInner {
    cells: HashMap<CellId, BeliefCell>,
    propagators: HashMap<PropagatorId, Propagator>,
    subscribers: HashMap<CellId, Vec<PropagatorId>>,
    jtms: Jtms,
    node_name_counter: u64,
}

impl NetworkInner {
    fn new() -> Self {
        Self {
            cells: HashMap::new(),
            propagators: HashMap::new(),
            subscribers: HashMap::new(),
            jtms: Jtms::new(),
            node_name_counter: 0,
        }
    }

    fn fresh_node_name(&mut self) -> String {
        self.node_name_counter += 1;
        format!("belief#{}", self.node_name_counter)
    }

    fn cell(&self, id: CellId) -> Result<&BeliefCell> {
        self.cells.get(&id).ok_or(NetworkError::CellNotFound(id))
    }

    fn active_value_of(&self, id: CellId) -> Value {
        // Callers only reach this with ids already validated to exist.
        self.cells[&id].active_value(|n| self.jtms.node_label(n) == Label::In)
    }

    fn snapshot(&self) -> HashMap<CellId, Value> {
        self.cells.keys().map(|id| (*id, self.active_value_of(*id))).collect()
    }

    /// The node(s) supporting a cell's active value, for use as a derived
    /// write's `in_list`.
    ///
    /// Normally this is a single `In` belief whose value equals the active
    /// value — any one such node suffices, since they all agree. Only when
    /// the active value is `contradiction` do we need every conflicting
    /// `In` node, because no single node's value equals `contradiction` and
    /// the derived write must depend on the whole conflicting set to be
    /// retracted correctly if any one of them goes `Out`.
    fn supporting_nodes(&self, id: CellId) -> Vec<NodeId> {
        let cell = &self.cells[&id];
        let active = self.active_value_of(id);
        if active == Value::Contradiction {
            return cell
                .beliefs()
                .iter()
                .filter(|b| self.jtms.node_label(b.node) == Label::In)
                .map(|b| b.node)
                .collect();
        }
        cell.beliefs()
            .iter()
            .find(|b| self.jtms.node_label(b.node) == Label::In && lattice::equal(cell.kind(), &b.value, &active))
            .map(|b| vec![b.node])
            .unwrap_or_default()
    }

    fn on_cell_changed(&mut self, id: CellId) {
        let subscribers = self.subscribers.get(&id).cloned().unwrap_or_default();
        for pid in subscribers {
            self.fire_propagator(pid);
        }
    }

    fn fire_propagator(&mut self, pid: PropagatorId) {
        let (inputs, informant) = match self.propagators.get(&pid) {
            Some(p) => (p.inputs().to_vec(), p.informant().to_string()),
            None => return,
        };
        let input_values: Vec<Value> = inputs.iter().map(|c| self.active_value_of(*c)).collect();
        let output = match self.propagators.get(&pid) {
            Some(p) => p.fire(&input_values),
            None => return,
        };
        let PropagatorOutput::Write(writes) = output else {
            return;
        };
        log::debug!("propagator {pid} ({informant}) firing, {} write(s)", writes.len());
        let in_list: Vec<NodeId> = inputs.iter().flat_map(|c| self.supporting_nodes(*c)).collect();
        for (cell_id, value) in writes {
            if self.cells.contains_key(&cell_id) {
                self.derived_add(cell_id, value, &informant, &in_list);
            }
        }
    }

    fn derived_add(&mut self, cell_id: CellId, value: Value, informant: &str, in_list: &[NodeId]) {
        let kind = self.cells[&cell_id].kind();
        if !value.matches_kind(kind) {
            log::debug!("propagator {informant} wrote a value that doesn't match cell {cell_id}'s lattice, dropping it");
            return;
        }
        let before = self.active_value_of(cell_id);

        let existing = self.cells[&cell_id].find(informant, &value).map(|b| b.node);
        let node = match existing {
            Some(n) => n,
            None => {
                let name = self.fresh_node_name();
                let n = self.jtms.create_node(name);
                self.cells.get_mut(&cell_id).unwrap().push(Belief {
                    value: value.clone(),
                    node: n,
                    informant: informant.to_string(),
                });
                n
            }
        };
        self.jtms.justify_node(node, informant.to_string(), in_list, &[]);

        let after = self.active_value_of(cell_id);
        if !lattice::equal(kind, &before, &after) {
            log::trace!("cell {cell_id} active value changed under derivation from {informant}");
            self.on_cell_changed(cell_id);
        }
    }
}

/// A belief network: a shared, mutex-serialized collection of cells and
/// propagators sitting on top of one JTMS.
///
/// Every public method runs its work to a full propagation fixpoint before
/// returning — callers never observe an intermediate, mid-propagation
/// state. `Network` is cheaply `Clone`; clones share the same underlying
/// network.
#[derive(Clone)]
pub struct Network {
    inner: Arc<Mutex<NetworkInner>>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NetworkInner::new())),
        }
    }

    /// Create a new belief cell with the given lattice kind.
    pub fn create_cell(&self, kind: LatticeKind) -> CellId {
        let mut inner = self.inner.lock().unwrap();
        let id = CellId::fresh();
        inner.cells.insert(id, BeliefCell::new(id, kind));
        id
    }

    /// Install a propagator reading `inputs` and writing `outputs`. Fires
    /// immediately once, using whatever active values its inputs already
    /// have.
    pub fn create_propagator(
        &self,
        inputs: &[CellId],
        outputs: &[CellId],
        informant: impl Into<String>,
        f: PropagatorFn,
    ) -> Result<PropagatorId> {
        let informant = informant.into();
        if informant.is_empty() {
            return Err(NetworkError::InformantRequired);
        }
        let mut inner = self.inner.lock().unwrap();
        // Only inputs must pre-exist; a propagator may forward-reference
        // output cells that don't exist yet, and a write to an unknown
        // output cell is silently dropped when the propagator fires.
        let missing: Vec<CellId> = inputs
            .iter()
            .filter(|c| !inner.cells.contains_key(c))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(NetworkError::CellsNotFound(missing));
        }

        let pid = PropagatorId::fresh();
        let propagator = Propagator::new(pid, inputs.to_vec(), outputs.to_vec(), informant, f);
        inner.propagators.insert(pid, propagator);
        for input in inputs {
            inner.subscribers.entry(*input).or_default().push(pid);
        }
        inner.fire_propagator(pid);
        Ok(pid)
    }

    /// Assert a belief into `cell`, tagged with `informant`. Idempotent: a
    /// repeated `add_content` with the same informant and an equal value is
    /// a no-op.
    pub fn add_content(&self, cell: CellId, value: Value, informant: impl Into<String>) -> Result<()> {
        let informant = informant.into();
        if informant.is_empty() {
            return Err(NetworkError::InformantRequired);
        }
        let mut inner = self.inner.lock().unwrap();
        let kind = inner.cell(cell)?.kind();
        if !value.matches_kind(kind) {
            return Err(NetworkError::LatticeMismatch(cell));
        }
        // Idempotent only while the matching belief is still In — a belief
        // left over from a retracted informant has an Out node, and
        // re-adding must mint a fresh node rather than silently no-op,
        // since the old node is gone for good as far as the JTMS is
        // concerned.
        let existing = inner.cell(cell)?.find(&informant, &value).map(|b| b.node);
        if let Some(node) = existing {
            if inner.jtms.node_label(node) == Label::In {
                return Ok(());
            }
        }

        log::debug!("add_content cell={cell} informant={informant}");
        let before = inner.active_value_of(cell);
        let name = inner.fresh_node_name();
        let node = inner.jtms.create_node(name);
        inner.jtms.assume_node(node);
        inner.cells.get_mut(&cell).unwrap().push(Belief {
            value,
            node,
            informant,
        });
        let after = inner.active_value_of(cell);
        if !lattice::equal(kind, &before, &after) {
            inner.on_cell_changed(cell);
        }
        Ok(())
    }

    /// Retract every belief `informant` asserted into `cell`. A no-op if
    /// `informant` never asserted anything there.
    ///
    /// Relabels the underlying JTMS nodes to a fixpoint, which may cascade
    /// into derived beliefs elsewhere losing their support automatically.
    /// Only propagators downstream of a cell whose active value actually
    /// changed are re-fired.
    pub fn retract_content(&self, cell: CellId, informant: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.cell(cell)?;
        let nodes: Vec<NodeId> = inner
            .cell(cell)?
            .beliefs()
            .iter()
            .filter(|b| b.informant == informant)
            .map(|b| b.node)
            .collect();
        if nodes.is_empty() {
            return Ok(());
        }

        log::debug!("retract_content cell={cell} informant={informant}");
        let before = inner.snapshot();
        for node in nodes {
            inner.jtms.retract_assumption(node);
        }
        let dirty: Vec<CellId> = before
            .iter()
            .filter(|(id, old)| {
                let new = inner.active_value_of(**id);
                !lattice::equal(inner.cells[id].kind(), old, &new)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in dirty {
            inner.on_cell_changed(id);
        }
        Ok(())
    }

    /// Read a cell's current active value.
    pub fn read_cell(&self, cell: CellId) -> Result<Value> {
        let inner = self.inner.lock().unwrap();
        inner.cell(cell)?;
        Ok(inner.active_value_of(cell))
    }

    /// Create a standalone JTMS node by name (idempotent on name), for
    /// callers driving the JTMS directly without cells.
    pub fn create_node(&self, name: impl Into<String>) -> NodeId {
        self.inner.lock().unwrap().jtms.create_node(name)
    }

    /// Append a justification to a raw JTMS node.
    pub fn justify_node(&self, node: NodeId, informant: impl Into<String>, in_list: &[NodeId], out_list: &[NodeId]) {
        self.inner.lock().unwrap().jtms.justify_node(node, informant, in_list, out_list);
    }

    /// Mark a raw JTMS node an assumption.
    pub fn assume_node(&self, node: NodeId) {
        self.inner.lock().unwrap().jtms.assume_node(node);
    }

    /// Retract a raw JTMS node's assumption justification.
    pub fn retract_assumption(&self, node: NodeId) {
        self.inner.lock().unwrap().jtms.retract_assumption(node);
    }

    /// A raw JTMS node's current label.
    pub fn node_label(&self, node: NodeId) -> Label {
        self.inner.lock().unwrap().jtms.node_label(node)
    }

    /// The justification currently supporting a raw JTMS node, if any.
    pub fn why(&self, node: NodeId) -> Option<Justification> {
        self.inner.lock().unwrap().jtms.why(node).cloned()
    }

    /// Is a raw JTMS node currently marked an assumption?
    pub fn is_assumption(&self, node: NodeId) -> bool {
        self.inner.lock().unwrap().jtms.is_assumption(node)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_content_then_read() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        net.add_content(c, Value::Number(42.0), "user").unwrap();
        assert_eq!(net.read_cell(c).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn add_content_is_idempotent() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        net.add_content(c, Value::Number(1.0), "a").unwrap();
        net.add_content(c, Value::Number(1.0), "a").unwrap();
        assert_eq!(net.read_cell(c).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn conflicting_beliefs_yield_contradiction() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        net.add_content(c, Value::Number(1.0), "a").unwrap();
        net.add_content(c, Value::Number(2.0), "b").unwrap();
        assert_eq!(net.read_cell(c).unwrap(), Value::Contradiction);
    }

    #[test]
    fn retract_restores_prior_value() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        net.add_content(c, Value::Number(1.0), "a").unwrap();
        net.add_content(c, Value::Number(2.0), "b").unwrap();
        net.retract_content(c, "b").unwrap();
        assert_eq!(net.read_cell(c).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn retract_unknown_informant_is_noop() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        net.add_content(c, Value::Number(1.0), "a").unwrap();
        net.retract_content(c, "nobody").unwrap();
        assert_eq!(net.read_cell(c).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn mismatched_lattice_kind_is_rejected() {
        let net = Network::new();
        let c = net.create_cell(LatticeKind::Number);
        let err = net
            .add_content(c, Value::Set(Default::default()), "a")
            .unwrap_err();
        assert_eq!(err, NetworkError::LatticeMismatch(c));
    }

    #[test]
    fn propagator_writes_to_declared_output() {
        let net = Network::new();
        let a = net.create_cell(LatticeKind::Number);
        let b = net.create_cell(LatticeKind::Number);
        net.create_propagator(
            &[a],
            &[b],
            "double",
            Box::new(move |inputs| match &inputs[0] {
                Value::Number(x) => PropagatorOutput::Write(vec![(b, Value::Number(*x * 2.0))]),
                _ => PropagatorOutput::Skip,
            }),
        )
        .unwrap();
        net.add_content(a, Value::Number(3.0), "user").unwrap();
        assert_eq!(net.read_cell(b).unwrap(), Value::Number(6.0));
    }

    #[test]
    fn diamond_cascade_resolves_to_single_value() {
        let net = Network::new();
        let top = net.create_cell(LatticeKind::Number);
        let left = net.create_cell(LatticeKind::Number);
        let right = net.create_cell(LatticeKind::Number);
        let bottom = net.create_cell(LatticeKind::Number);

        net.create_propagator(
            &[top],
            &[left],
            "copy:left",
            Box::new(move |inputs| match &inputs[0] {
                Value::Number(x) => PropagatorOutput::Write(vec![(left, Value::Number(*x))]),
                _ => PropagatorOutput::Skip,
            }),
        )
        .unwrap();
        net.create_propagator(
            &[top],
            &[right],
            "copy:right",
            Box::new(move |inputs| match &inputs[0] {
                Value::Number(x) => PropagatorOutput::Write(vec![(right, Value::Number(*x))]),
                _ => PropagatorOutput::Skip,
            }),
        )
        .unwrap();
        net.create_propagator(
            &[left, right],
            &[bottom],
            "join",
            Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
                (Value::Number(x), Value::Number(y)) if x == y => {
                    PropagatorOutput::Write(vec![(bottom, Value::Number(*x))])
                }
                (Value::Number(_), Value::Number(_)) => PropagatorOutput::Skip,
                _ => PropagatorOutput::Skip,
            }),
        )
        .unwrap();

        net.add_content(top, Value::Number(7.0), "user").unwrap();
        assert_eq!(net.read_cell(left).unwrap(), Value::Number(7.0));
        assert_eq!(net.read_cell(right).unwrap(), Value::Number(7.0));
        assert_eq!(net.read_cell(bottom).unwrap(), Value::Number(7.0));
    }
}
