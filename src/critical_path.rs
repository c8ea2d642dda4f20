//! Critical path evaluation over the task network.
//!
//! The engine owns the set of registered (active) tasks and, on demand, runs
//! a two-pass computation over them: a dependency-ordered fixed point that
//! assigns each task its critical cost (the longest remaining path to the
//! network's end) and detects cycles, then a forward pass that propagates
//! early start/finish times from the initial tasks. Results are written back
//! onto the network's tasks and nodes for the editor to read.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::models::{Network, NodeId, TaskId};
use crate::{log_changes, log_checks, log_debug};

/// Errors from critical path evaluation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The network contains a dependency cycle, so no start-to-finish path
    /// exists. Engine output is undefined until the next successful
    /// evaluation.
    #[error("Cyclic dependency in network")]
    CycleDetected,
}

/// The critical-path engine.
///
/// Holds the active task set and the most recently computed path length.
/// Single-threaded and on-demand: nothing runs until
/// [`critical_path`](CriticalPath::critical_path) is called.
pub struct CriticalPath {
    active: FxHashSet<TaskId>,
    cp_length: Option<i64>,
    config: EngineConfig,
}

impl CriticalPath {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            active: FxHashSet::default(),
            cp_length: None,
            config,
        }
    }

    /// Register a task with the engine.
    ///
    /// `None` (the editor's "nothing drawn" result) is ignored. Registration
    /// has set semantics: re-adding the same task is a no-op.
    pub fn add_task(&mut self, task: Option<TaskId>) {
        if let Some(id) = task {
            self.active.insert(id);
        }
    }

    /// Unregister every task and invalidate the stored path length.
    pub fn delete_all_tasks(&mut self) {
        self.active.clear();
        self.cp_length = None;
    }

    /// The tasks currently registered with the engine.
    pub fn active_tasks(&self) -> &FxHashSet<TaskId> {
        &self.active
    }

    /// Length of the critical path from the last successful evaluation.
    ///
    /// `None` when the active set was empty, after a cycle was detected, or
    /// before the first evaluation. An empty network has no path length; it
    /// must not be read as zero.
    pub fn cp_length(&self) -> Option<i64> {
        self.cp_length
    }

    /// Evaluate the network.
    ///
    /// Sweeps tombstoned tasks out of the active set, resets all computed
    /// fields, then assigns every active task its critical cost, latest
    /// start, and early start/finish, and every connected node its computed
    /// early/late event times. Fails with [`EngineError::CycleDetected`] when
    /// the network is cyclic, leaving computed state undefined.
    pub fn critical_path(&mut self, net: &mut Network) -> Result<(), EngineError> {
        self.cp_length = None;
        self.sweep(net);
        self.reset(net);
        self.solve_costs(net)?;
        self.apply_path_length(net);
        let initials = self.initials(net);
        self.propagate_early(net, &initials);
        self.settle_terminals(net);
        Ok(())
    }

    /// Tombstone sweep: drop every active id whose arena entry is missing or
    /// removed, purging the entry and unlinking both endpoints best-effort.
    fn sweep(&mut self, net: &mut Network) {
        let stale: Vec<TaskId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| net.task(id).map_or(true, |t| !t.is_active()))
            .collect();
        for id in stale {
            log_changes!(self.config.verbosity, "sweep: purging removed task {id}");
            self.active.remove(&id);
            net.purge_task(id);
        }
    }

    /// Zero the computed fields of every active task and of every node the
    /// active tasks touch, so a previous evaluation cannot leak into this one.
    fn reset(&mut self, net: &mut Network) {
        let mut touched: FxHashSet<NodeId> = FxHashSet::default();
        for &id in &self.active {
            if let Some(task) = net.task_mut(id) {
                task.early_start = 0;
                task.early_finish = 0;
                task.latest_start = 0;
                task.critical_cost = 0;
                touched.insert(task.start());
                touched.insert(task.end());
            }
        }
        for id in touched {
            if let Some(node) = net.node_mut(id) {
                node.computed_early = 0;
                node.computed_late = 0;
            }
        }
    }

    /// Suffix-cost fixed point with cycle detection.
    ///
    /// A task is finalized once every active task succeeding its end node has
    /// been finalized; its critical cost is its duration plus the largest
    /// successor cost. A full sweep of the remaining tasks that finalizes
    /// nothing means the network is cyclic.
    fn solve_costs(&self, net: &mut Network) -> Result<(), EngineError> {
        let mut completed: FxHashSet<TaskId> = FxHashSet::default();
        let mut remaining: Vec<TaskId> = self.active.iter().copied().collect();

        while !remaining.is_empty() {
            let mut progress = false;
            let mut deferred = Vec::with_capacity(remaining.len());
            for id in remaining {
                match self.successor_cost(net, id, &completed) {
                    Some(cost) => {
                        if let Some(task) = net.task_mut(id) {
                            task.critical_cost = task.duration() + cost;
                            log_debug!(
                                self.config.verbosity,
                                "task {id}: critical cost {}",
                                task.critical_cost
                            );
                        }
                        completed.insert(id);
                        progress = true;
                    }
                    None => deferred.push(id),
                }
            }
            if !progress {
                log_checks!(
                    self.config.verbosity,
                    "no progress with {} tasks remaining: cycle",
                    deferred.len()
                );
                return Err(EngineError::CycleDetected);
            }
            remaining = deferred;
        }
        Ok(())
    }

    /// Largest critical cost among the active tasks succeeding `id`'s end
    /// node (0 when there are none), or `None` while any of them is still
    /// unsolved.
    fn successor_cost(
        &self,
        net: &Network,
        id: TaskId,
        completed: &FxHashSet<TaskId>,
    ) -> Option<i64> {
        let Some(task) = net.task(id) else {
            // Swept out from under us; nothing depends on it
            return Some(0);
        };
        let mut cost = 0;
        if let Some(end) = net.node(task.end()) {
            for &succ in end.succeeding() {
                if !self.active.contains(&succ) {
                    continue;
                }
                if !completed.contains(&succ) {
                    return None;
                }
                if let Some(s) = net.task(succ) {
                    cost = cost.max(s.critical_cost);
                }
            }
        }
        Some(cost)
    }

    /// Record the path length (the maximum critical cost) and derive every
    /// active task's latest start from it.
    ///
    /// An empty active set has no path length; the stored value stays `None`.
    fn apply_path_length(&mut self, net: &mut Network) {
        let length = self
            .active
            .iter()
            .filter_map(|&id| net.task(id))
            .map(|t| t.critical_cost)
            .max();
        let Some(length) = length else {
            return;
        };
        for &id in &self.active {
            if let Some(task) = net.task_mut(id) {
                task.latest_start = length - task.critical_cost;
            }
        }
        log_changes!(self.config.verbosity, "critical path length: {length}");
        self.cp_length = Some(length);
    }

    /// Identify the initial tasks: active tasks that appear in no active
    /// task's end-node succeeding set.
    fn initials(&self, net: &Network) -> FxHashSet<TaskId> {
        let mut initials = self.active.clone();
        for &id in &self.active {
            let Some(task) = net.task(id) else {
                continue;
            };
            let Some(end) = net.node(task.end()) else {
                continue;
            };
            for succ in end.succeeding() {
                initials.remove(succ);
            }
        }
        log_checks!(self.config.verbosity, "{} initial tasks", initials.len());
        initials
    }

    /// Forward pass: propagate early start/finish times from the initial
    /// tasks through an explicit FIFO worklist, and aggregate each visited
    /// successor's start node's computed early (max over visits) and late
    /// (min over visits) event times.
    ///
    /// A successor is updated, and re-enqueued, only when the predecessor's
    /// early finish is at least its current early start; this realizes "max
    /// over all predecessors" and limits requeueing to informative updates.
    /// Termination is guaranteed because the cost pass just established the
    /// active graph is acyclic.
    fn propagate_early(&self, net: &mut Network, initials: &FxHashSet<TaskId>) {
        let mut queue: VecDeque<TaskId> = VecDeque::new();
        for &id in initials {
            let start = {
                let Some(task) = net.task_mut(id) else {
                    continue;
                };
                task.early_start = 0;
                task.early_finish = task.duration();
                task.start()
            };
            if let Some(node) = net.node_mut(start) {
                node.computed_early = 0;
            }
            queue.push_back(id);
        }

        // A node's computed_late starts unset; the first visit seeds it
        let mut late_seen: FxHashSet<NodeId> = FxHashSet::default();

        while let Some(id) = queue.pop_front() {
            let (finish, end) = match net.task(id) {
                Some(task) => (task.early_finish, task.end()),
                None => continue,
            };
            let successors: Vec<TaskId> = match net.node(end) {
                Some(node) => node
                    .succeeding()
                    .iter()
                    .copied()
                    .filter(|succ| self.active.contains(succ))
                    .collect(),
                None => continue,
            };
            for succ in successors {
                let Some(task) = net.task_mut(succ) else {
                    continue;
                };
                if finish >= task.early_start {
                    task.early_start = finish;
                    task.early_finish = finish + task.duration();
                    log_debug!(
                        self.config.verbosity,
                        "task {succ}: early start {finish}, early finish {}",
                        task.early_finish
                    );
                    queue.push_back(succ);
                }
                let (start, early, late) = (task.start(), task.early_start, task.latest_start);
                if let Some(node) = net.node_mut(start) {
                    if late_seen.insert(start) {
                        node.computed_late = late;
                    } else if late < node.computed_late {
                        node.computed_late = late;
                    }
                    if early > node.computed_early {
                        node.computed_early = early;
                    }
                }
            }
        }
    }

    /// Terminal settlement: a connected node with no active outgoing task is
    /// never visited as a successor's start node, so its display values come
    /// from any active inbound task. At a sink every inbound task agrees:
    /// latest start plus duration equals the path length.
    fn settle_terminals(&self, net: &mut Network) {
        let mut settled: Vec<(NodeId, i64)> = Vec::new();
        for node in net.nodes() {
            if !node.is_connected() {
                continue;
            }
            let has_outgoing = node
                .succeeding()
                .iter()
                .any(|id| self.active.contains(id));
            if has_outgoing {
                continue;
            }
            let inbound = node
                .preceding()
                .iter()
                .copied()
                .find(|id| self.active.contains(id))
                .and_then(|id| net.task(id));
            if let Some(task) = inbound {
                settled.push((node.index(), task.latest_start + task.duration()));
            }
        }
        for (id, value) in settled {
            if let Some(node) = net.node_mut(id) {
                node.computed_early = value;
                node.computed_late = value;
            }
        }
    }
}

impl Default for CriticalPath {
    fn default() -> Self {
        Self::new()
    }
}
