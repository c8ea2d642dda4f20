//! Critical path (CPM) evaluation for interactive task networks.
//!
//! This crate is the core behind a project-scheduling exercise editor: the
//! editor builds a directed network of events ([`Node`]) joined by
//! duration-weighted tasks ([`Task`]) inside a [`Network`] arena, registers
//! tasks with the [`CriticalPath`] engine, and asks it to evaluate on demand.
//! The engine computes each task's earliest start/finish, latest start, and
//! critical cost, the overall path length, and per-node early/late event
//! times, detecting cyclic (unsolvable) networks as it goes. The [`scoring`]
//! module then compares user-entered answers against the computed values.
//!
//! Networks are mutated incrementally: tasks and nodes come and go at
//! arbitrary times, with removals handled as tombstones that the engine
//! lazily sweeps before each evaluation. Everything is in-memory,
//! single-threaded, and synchronous.

pub mod config;
pub mod critical_path;
pub mod logging;
pub mod models;
pub mod scoring;

pub use config::EngineConfig;
pub use critical_path::{CriticalPath, EngineError};
pub use models::{Network, Node, NodeId, Task, TaskId, TaskState};
pub use scoring::{is_critical, node_marks, task_marks};
