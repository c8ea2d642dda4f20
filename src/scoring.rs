//! Feedback-mode marking of user answers against computed results.
//!
//! Runs after a successful evaluation; every check is a pure comparison of
//! user-entered fields against the values the engine wrote back. Unconnected
//! nodes and zero-duration dummy tasks are never scored, and an empty
//! denominator yields zero marks rather than a fault.

use crate::models::{Network, Task};

/// Whether a task lies on the critical path.
///
/// A task is critical when it has no slack between its endpoints: the end
/// node's computed late time minus the start node's computed early time
/// leaves exactly the task's duration. A task with a torn-down endpoint is
/// never critical.
pub fn is_critical(net: &Network, task: &Task) -> bool {
    let (Some(start), Some(end)) = (net.node(task.start()), net.node(task.end())) else {
        return false;
    };
    end.computed_late - start.computed_early - task.duration() == 0
}

/// Marks for the user's node event times, on a 0..=4 scale.
///
/// Each connected node contributes one mark per matching field (early and
/// late); the total scales as `(4 * marks) / (2 * connected)`. Zero when no
/// node is connected.
pub fn node_marks(net: &Network) -> i64 {
    let mut marks = 0i64;
    let mut connected = 0i64;
    for node in net.nodes() {
        if !node.is_connected() {
            continue;
        }
        connected += 1;
        if node.early_input == node.computed_early {
            marks += 1;
        }
        if node.late_input == node.computed_late {
            marks += 1;
        }
    }
    if connected == 0 {
        0
    } else {
        (4 * marks) / (2 * connected)
    }
}

/// Marks for the user's critical-task selections, on a 0..=2 scale.
///
/// A task is scored when it is active and not a dummy (zero duration), and
/// correct when its marking agrees with [`is_critical`]. The total scales as
/// `(2 * correct) / scored`. Zero when nothing is scored.
pub fn task_marks(net: &Network) -> i64 {
    let mut correct = 0i64;
    let mut scored = 0i64;
    for (_, task) in net.tasks() {
        if !task.is_active() || task.duration() == 0 {
            continue;
        }
        scored += 1;
        if task.crit_selected == is_critical(net, task) {
            correct += 1;
        }
    }
    if scored == 0 {
        0
    } else {
        (2 * correct) / scored
    }
}
