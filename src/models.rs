//! Core data model for the task network.
//!
//! Nodes (events) and tasks (directed, duration-weighted edges) live in an
//! id-addressed arena owned by [`Network`]. Adjacency is stored as id-sets on
//! each node rather than direct references, so the graph has no ownership
//! cycles and teardown can happen in any order.

use rustc_hash::{FxHashMap, FxHashSet};

/// Stable identifier for a node (u32 for compact storage and fast hashing).
pub type NodeId = u32;

/// Stable identifier for a task.
pub type TaskId = u32;

/// Lifecycle state of a task.
///
/// A removed task is a tombstone: it stays in the arena, still referenced by
/// its endpoints' incident sets, until the engine's next sweep purges it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Active,
    Removed,
}

/// A scheduling event.
///
/// Holds the user-entered early/late event times alongside the values the
/// engine computes, plus the two incident-task sets that form the network's
/// sole adjacency representation.
#[derive(Clone, Debug)]
pub struct Node {
    index: NodeId,
    /// User-entered earliest event time.
    pub early_input: i64,
    /// User-entered latest event time.
    pub late_input: i64,
    /// Engine-computed earliest event time.
    pub computed_early: i64,
    /// Engine-computed latest event time.
    pub computed_late: i64,
    succeeding: FxHashSet<TaskId>,
    preceding: FxHashSet<TaskId>,
}

impl Node {
    fn new(index: NodeId) -> Self {
        Self {
            index,
            early_input: 0,
            late_input: 0,
            computed_early: 0,
            computed_late: 0,
            succeeding: FxHashSet::default(),
            preceding: FxHashSet::default(),
        }
    }

    /// The node's unique, immutable index.
    pub fn index(&self) -> NodeId {
        self.index
    }

    /// Tasks leaving this node.
    pub fn succeeding(&self) -> &FxHashSet<TaskId> {
        &self.succeeding
    }

    /// Tasks arriving at this node.
    pub fn preceding(&self) -> &FxHashSet<TaskId> {
        &self.preceding
    }

    /// A node with no incident tasks is unconnected and excluded from scoring.
    pub fn is_connected(&self) -> bool {
        !(self.succeeding.is_empty() && self.preceding.is_empty())
    }
}

/// A directed, duration-weighted dependency edge between two nodes.
///
/// Endpoints are fixed at creation and never rebound. The timing fields are
/// written by the engine on every successful evaluation.
#[derive(Clone, Debug)]
pub struct Task {
    start: NodeId,
    end: NodeId,
    duration: i64,
    state: TaskState,
    /// User's "this task is critical" marking, consumed by scoring.
    pub crit_selected: bool,
    /// Earliest possible start time (forward pass).
    pub early_start: i64,
    /// Earliest possible finish time (forward pass).
    pub early_finish: i64,
    /// Latest start that does not extend the critical path.
    pub latest_start: i64,
    /// Length of the longest remaining path from this task to the network's
    /// end, duration inclusive.
    pub critical_cost: i64,
}

impl Task {
    fn new(start: NodeId, end: NodeId, duration: i64) -> Self {
        Self {
            start,
            end,
            duration,
            state: TaskState::Active,
            crit_selected: false,
            early_start: 0,
            early_finish: 0,
            latest_start: 0,
            critical_cost: 0,
        }
    }

    /// Node where the task begins.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Node where the task finishes.
    pub fn end(&self) -> NodeId {
        self.end
    }

    /// The task's duration. Always non-negative.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TaskState::Active
    }
}

/// Arena owning every node and task in the session's network.
///
/// The editor builds the network through this type; the engine reads it and
/// writes computed fields back. Duplicate ordered endpoint pairs are rejected
/// here, at the editor boundary, not by the engine.
#[derive(Clone, Debug, Default)]
pub struct Network {
    nodes: FxHashMap<NodeId, Node>,
    tasks: FxHashMap<TaskId, Task>,
    next_node: NodeId,
    next_task: TaskId,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new event node and return its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = self.next_node;
        self.next_node += 1;
        self.nodes.insert(id, Node::new(id));
        id
    }

    /// Create a task from `start` to `end` and link it into both endpoints'
    /// incident sets.
    ///
    /// Returns `None` when either endpoint is missing, the duration is
    /// negative, or an active task with the same ordered endpoint pair
    /// already exists.
    pub fn add_task(&mut self, start: NodeId, end: NodeId, duration: i64) -> Option<TaskId> {
        if duration < 0 || !self.nodes.contains_key(&start) || !self.nodes.contains_key(&end) {
            return None;
        }
        let duplicate = self
            .tasks
            .values()
            .any(|t| t.is_active() && t.start == start && t.end == end);
        if duplicate {
            return None;
        }
        let id = self.next_task;
        self.next_task += 1;
        self.tasks.insert(id, Task::new(start, end, duration));
        if let Some(node) = self.nodes.get_mut(&start) {
            node.succeeding.insert(id);
        }
        if let Some(node) = self.nodes.get_mut(&end) {
            node.preceding.insert(id);
        }
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    /// Iterate over every node in the arena.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over every task in the arena, tombstones included.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().map(|(&id, t)| (id, t))
    }

    /// Update a task's duration.
    ///
    /// Returns false without touching anything when the duration is negative
    /// or the task is missing or removed.
    pub fn set_duration(&mut self, id: TaskId, duration: i64) -> bool {
        if duration < 0 {
            return false;
        }
        match self.tasks.get_mut(&id) {
            Some(task) if task.is_active() => {
                task.duration = duration;
                true
            }
            _ => false,
        }
    }

    /// Mark a task as removed.
    ///
    /// The arena entry and the endpoints' incidence links stay in place until
    /// the engine's next sweep purges them. Removing a missing or already
    /// removed task is a no-op.
    pub fn remove_task(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.state = TaskState::Removed;
        }
    }

    /// Soft-delete a node: mark every incident task removed and drop the node
    /// from the arena.
    ///
    /// Incident tasks keep referencing the dropped node until the sweep; the
    /// unlink on their other endpoint then proceeds normally, and the unlink
    /// on this one is a tolerated no-op.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        for task_id in node.succeeding.iter().chain(node.preceding.iter()) {
            if let Some(task) = self.tasks.get_mut(task_id) {
                task.state = TaskState::Removed;
            }
        }
    }

    /// Drop a task from the arena and unlink it from both endpoints'
    /// incident sets, best effort.
    ///
    /// A torn-down endpoint is a no-op, not an error.
    pub(crate) fn purge_task(&mut self, id: TaskId) {
        let Some(task) = self.tasks.remove(&id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&task.start) {
            node.succeeding.remove(&id);
        }
        if let Some(node) = self.nodes.get_mut(&task.end) {
            node.preceding.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_net() -> (Network, NodeId, NodeId) {
        let mut net = Network::new();
        let a = net.add_node();
        let b = net.add_node();
        (net, a, b)
    }

    #[test]
    fn test_add_task_links_both_endpoints() {
        let (mut net, a, b) = two_node_net();
        let t = net.add_task(a, b, 3).unwrap();

        assert!(net.node(a).unwrap().succeeding().contains(&t));
        assert!(net.node(b).unwrap().preceding().contains(&t));
        assert_eq!(net.task(t).unwrap().duration(), 3);
        assert_eq!(net.task(t).unwrap().start(), a);
        assert_eq!(net.task(t).unwrap().end(), b);
    }

    #[test]
    fn test_add_task_rejects_missing_endpoint() {
        let (mut net, a, _) = two_node_net();
        assert_eq!(net.add_task(a, 99, 1), None);
        assert_eq!(net.add_task(99, a, 1), None);
    }

    #[test]
    fn test_add_task_rejects_negative_duration() {
        let (mut net, a, b) = two_node_net();
        assert_eq!(net.add_task(a, b, -1), None);
    }

    #[test]
    fn test_add_task_rejects_duplicate_ordered_pair() {
        let (mut net, a, b) = two_node_net();
        assert!(net.add_task(a, b, 1).is_some());
        assert_eq!(net.add_task(a, b, 5), None);
        // Reverse direction is a different pair
        assert!(net.add_task(b, a, 1).is_some());
    }

    #[test]
    fn test_removed_task_frees_ordered_pair_after_purge() {
        let (mut net, a, b) = two_node_net();
        let t = net.add_task(a, b, 1).unwrap();
        net.remove_task(t);
        net.purge_task(t);
        assert!(net.add_task(a, b, 2).is_some());
    }

    #[test]
    fn test_set_duration() {
        let (mut net, a, b) = two_node_net();
        let t = net.add_task(a, b, 1).unwrap();

        assert!(net.set_duration(t, 7));
        assert_eq!(net.task(t).unwrap().duration(), 7);
        assert!(!net.set_duration(t, -2));
        assert_eq!(net.task(t).unwrap().duration(), 7);

        net.remove_task(t);
        assert!(!net.set_duration(t, 9));
    }

    #[test]
    fn test_is_connected() {
        let (mut net, a, b) = two_node_net();
        let lone = net.add_node();
        net.add_task(a, b, 1).unwrap();

        assert!(net.node(a).unwrap().is_connected());
        assert!(net.node(b).unwrap().is_connected());
        assert!(!net.node(lone).unwrap().is_connected());
    }

    #[test]
    fn test_remove_node_tombstones_incident_tasks() {
        let mut net = Network::new();
        let a = net.add_node();
        let b = net.add_node();
        let c = net.add_node();
        let ab = net.add_task(a, b, 1).unwrap();
        let bc = net.add_task(b, c, 1).unwrap();

        net.remove_node(b);
        assert!(net.node(b).is_none());
        assert_eq!(net.task(ab).unwrap().state(), TaskState::Removed);
        assert_eq!(net.task(bc).unwrap().state(), TaskState::Removed);
        // Other endpoints still hold dangling links pending the sweep
        assert!(net.node(a).unwrap().succeeding().contains(&ab));
        assert!(net.node(c).unwrap().preceding().contains(&bc));
    }

    #[test]
    fn test_purge_tolerates_torn_down_endpoint() {
        let (mut net, a, b) = two_node_net();
        let t = net.add_task(a, b, 1).unwrap();
        net.remove_node(a);

        // Start node is gone; only the end node needs unlinking
        net.purge_task(t);
        assert!(net.task(t).is_none());
        assert!(!net.node(b).unwrap().preceding().contains(&t));

        // Purging again is a no-op
        net.purge_task(t);
    }
}
