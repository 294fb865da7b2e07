//! Justification-based Truth Maintenance System.
//!
//! A [`Jtms`] is a graph of labeled nodes linked by [`Justification`]s.
//! Asserting, justifying, or retracting a node re-runs label propagation to
//! a fixpoint; nodes are never deleted, only relabeled. This module is
//! usable on its own (see the non-monotonic default test below) — the
//! [`Network`](crate::network::Network) is simply its main customer.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Informant string `justify_node`/`create_node` use to mark an assumption.
pub const ASSUMPTION_INFORMANT: &str = "assumption";

/// Opaque handle to a JTMS node. Minted once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The handle's raw numeric id, useful for logging.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// A JTMS node's current label.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Believed: some justification is currently valid.
    In,
    /// Not currently supported.
    Out,
}

/// `(informant, in_list, out_list)` — valid iff every `in_list` node is
/// `In` and every `out_list` node is `Out`.
#[derive(Debug, Clone, PartialEq)]
pub struct Justification {
    /// Source of this justification: an assumption, a propagator id, or a
    /// caller-chosen rule name.
    pub informant: String,
    /// Antecedents that must be `In`.
    pub in_list: Vec<NodeId>,
    /// Antecedents that must be `Out`.
    pub out_list: Vec<NodeId>,
}

impl Justification {
    fn is_assumption(&self) -> bool {
        self.informant == ASSUMPTION_INFORMANT
    }
}

struct NodeRecord {
    label: Label,
    assumption: bool,
    justifications: Vec<Justification>,
    support: Option<usize>,
    consequences: HashSet<NodeId>,
}

impl NodeRecord {
    fn new() -> Self {
        Self {
            label: Label::Out,
            assumption: false,
            justifications: Vec::new(),
            support: None,
            consequences: HashSet::new(),
        }
    }
}

/// The truth maintenance system: nodes, justifications, and the fixpoint
/// label-propagation worklist.
pub struct Jtms {
    nodes: HashMap<NodeId, NodeRecord>,
    names: HashMap<String, NodeId>,
    next_id: AtomicU64,
}

impl Jtms {
    /// Create an empty JTMS.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            names: HashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Idempotent: returns the existing node if `name` was already created.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        if let Some(id) = self.names.get(&name) {
            return *id;
        }
        let id = NodeId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.nodes.insert(id, NodeRecord::new());
        self.names.insert(name, id);
        id
    }

    /// Append a justification to `node` and propagate from it.
    ///
    /// Returns the nodes whose label flipped as a result (possibly empty).
    pub fn justify_node(
        &mut self,
        node: NodeId,
        informant: impl Into<String>,
        in_list: &[NodeId],
        out_list: &[NodeId],
    ) -> Vec<NodeId> {
        let justification = Justification {
            informant: informant.into(),
            in_list: in_list.to_vec(),
            out_list: out_list.to_vec(),
        };
        for antecedent in in_list.iter().chain(out_list.iter()) {
            if let Some(rec) = self.nodes.get_mut(antecedent) {
                rec.consequences.insert(node);
            }
        }
        if let Some(rec) = self.nodes.get_mut(&node) {
            rec.justifications.push(justification);
        }
        log::trace!("jtms: justify {node} (now {} justifications)", self.nodes[&node].justifications.len());
        self.propagate(node)
    }

    /// Mark `node` an assumption: prepend `(assumption, [], [])` so it wins
    /// the insertion-order tie-break over any existing justification.
    pub fn assume_node(&mut self, node: NodeId) -> Vec<NodeId> {
        if let Some(rec) = self.nodes.get_mut(&node) {
            rec.assumption = true;
            rec.justifications.insert(
                0,
                Justification {
                    informant: ASSUMPTION_INFORMANT.to_string(),
                    in_list: Vec::new(),
                    out_list: Vec::new(),
                },
            );
        }
        log::trace!("jtms: assume {node}");
        self.propagate(node)
    }

    /// Remove every assumption justification from `node` and propagate.
    pub fn retract_assumption(&mut self, node: NodeId) -> Vec<NodeId> {
        if let Some(rec) = self.nodes.get_mut(&node) {
            rec.assumption = false;
            rec.justifications.retain(|j| !j.is_assumption());
        }
        log::trace!("jtms: retract assumption {node}");
        self.propagate(node)
    }

    /// Current label. Unknown handles read as `Out` (the JTMS itself never
    /// panics on a stale handle; rejecting unknown handles is the API
    /// layer's job).
    pub fn node_label(&self, node: NodeId) -> Label {
        self.nodes.get(&node).map(|r| r.label).unwrap_or(Label::Out)
    }

    /// The justification currently making `node` `In`, if any.
    pub fn why(&self, node: NodeId) -> Option<&Justification> {
        let rec = self.nodes.get(&node)?;
        rec.support.map(|i| &rec.justifications[i])
    }

    /// Is `node` currently marked an assumption?
    pub fn is_assumption(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map(|r| r.assumption).unwrap_or(false)
    }

    /// Walk `why` transitively back to assumption nodes, depth-first,
    /// deduplicating. A diagnostic convenience for dependency-directed
    /// backtracking built *above* the kernel — it performs no retraction.
    pub fn explain(&self, node: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if !seen.insert(n) {
                continue;
            }
            order.push(n);
            if let Some(j) = self.why(n) {
                for antecedent in j.in_list.iter().rev() {
                    stack.push(*antecedent);
                }
            }
        }
        order
    }

    fn justification_valid(&self, j: &Justification) -> bool {
        j.in_list.iter().all(|n| self.node_label(*n) == Label::In)
            && j.out_list.iter().all(|n| self.node_label(*n) == Label::Out)
    }

    fn compute_label(&self, node: NodeId) -> (Label, Option<usize>) {
        let rec = &self.nodes[&node];
        for (i, j) in rec.justifications.iter().enumerate() {
            if self.justification_valid(j) {
                return (Label::In, Some(i));
            }
        }
        (Label::Out, None)
    }

    /// Breadth-first worklist propagation starting at `node`; returns every
    /// node whose label changed.
    fn propagate(&mut self, start: NodeId) -> Vec<NodeId> {
        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        queue.push_back(start);
        queued.insert(start);
        let mut flipped = Vec::new();

        while let Some(n) = queue.pop_front() {
            queued.remove(&n);
            let (new_label, new_support) = self.compute_label(n);
            let rec = match self.nodes.get_mut(&n) {
                Some(r) => r,
                None => continue,
            };
            let label_changed = rec.label != new_label;
            rec.label = new_label;
            rec.support = new_support;
            if label_changed {
                log::trace!("jtms: {n} -> {new_label:?}");
                flipped.push(n);
                let consequences: Vec<NodeId> = rec.consequences.iter().copied().collect();
                for c in consequences {
                    if queued.insert(c) {
                        queue.push_back(c);
                    }
                }
            }
        }
        flipped
    }
}

impl Default for Jtms {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::In => write!(f, "In"),
            Label::Out => write!(f, "Out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_is_out() {
        let mut jtms = Jtms::new();
        let n = jtms.create_node("n");
        assert_eq!(jtms.node_label(n), Label::Out);
        assert!(jtms.why(n).is_none());
    }

    #[test]
    fn create_node_is_idempotent() {
        let mut jtms = Jtms::new();
        let a = jtms.create_node("x");
        let b = jtms.create_node("x");
        assert_eq!(a, b);
    }

    #[test]
    fn assume_then_retract() {
        let mut jtms = Jtms::new();
        let n = jtms.create_node("n");
        jtms.assume_node(n);
        assert_eq!(jtms.node_label(n), Label::In);
        assert!(jtms.is_assumption(n));

        jtms.retract_assumption(n);
        assert_eq!(jtms.node_label(n), Label::Out);
        assert!(!jtms.is_assumption(n));
    }

    /// Scenario 4 from the spec: a default ("birds fly unless known
    /// abnormal") implemented directly on raw JTMS nodes, no cells at all.
    #[test]
    fn non_monotonic_default() {
        let mut jtms = Jtms::new();
        let bird = jtms.create_node("bird");
        let abnormal = jtms.create_node("abnormal");
        let flies = jtms.create_node("flies");

        jtms.assume_node(bird);
        jtms.justify_node(flies, "default", &[bird], &[abnormal]);
        assert_eq!(jtms.node_label(flies), Label::In);

        jtms.assume_node(abnormal);
        assert_eq!(jtms.node_label(flies), Label::Out);

        jtms.retract_assumption(abnormal);
        assert_eq!(jtms.node_label(flies), Label::In);
    }

    #[test]
    fn insertion_order_tie_break() {
        let mut jtms = Jtms::new();
        let a = jtms.create_node("a");
        let goal = jtms.create_node("goal");
        jtms.assume_node(a);
        jtms.justify_node(goal, "rule1", &[a], &[]);
        jtms.justify_node(goal, "rule2", &[a], &[]);
        assert_eq!(jtms.why(goal).unwrap().informant, "rule1");
    }

    #[test]
    fn consequences_are_transitive() {
        let mut jtms = Jtms::new();
        let a = jtms.create_node("a");
        let b = jtms.create_node("b");
        let c = jtms.create_node("c");
        jtms.justify_node(b, "r1", &[a], &[]);
        jtms.justify_node(c, "r2", &[b], &[]);
        jtms.assume_node(a);
        assert_eq!(jtms.node_label(b), Label::In);
        assert_eq!(jtms.node_label(c), Label::In);
        jtms.retract_assumption(a);
        assert_eq!(jtms.node_label(b), Label::Out);
        assert_eq!(jtms.node_label(c), Label::Out);
    }

    #[test]
    fn explain_walks_back_to_assumptions() {
        let mut jtms = Jtms::new();
        let a = jtms.create_node("a");
        let b = jtms.create_node("b");
        jtms.assume_node(a);
        jtms.justify_node(b, "rule", &[a], &[]);
        let trail = jtms.explain(b);
        assert_eq!(trail, vec![b, a]);
    }
}
