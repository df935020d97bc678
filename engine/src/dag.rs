// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! The slice of the workflow graph that hooks integrate with: node and
//! category storage, the file table, and the transaction log of
//! state-change records. Scheduling and file staging live elsewhere.

use crate::category::Category;
use crate::summary::Summary;
use crate::task::{BatchTask, FileKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Ready to be submitted (or re-submitted) to the queue.
    Waiting,
    /// Submitted; a batch task is in flight.
    Running,
    /// Batch task finished and the hook chain accepted it.
    Complete,
    /// Batch task failed with no retry pending.
    Failed,
}

impl NodeState {
    pub(crate) fn can_transition_to(self, next: NodeState) -> bool {
        use NodeState::*;
        matches!(
            (self, next),
            (Waiting, Running)
                | (Running, Complete)
                | (Running, Failed)
                | (Running, Waiting)
                | (Failed, Waiting)
        )
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Waiting => write!(f, "waiting"),
            NodeState::Running => write!(f, "running"),
            NodeState::Complete => write!(f, "complete"),
            NodeState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileState {
    /// Known to the table, nothing observed yet.
    Unknown,
    /// A submitted task has promised to produce it.
    Expect,
    /// Present on the local filesystem.
    Exists,
    /// Consumed by every dependent; eligible for cleanup.
    Complete,
    /// Removed by the runtime.
    Delete,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::Unknown => write!(f, "unknown"),
            FileState::Expect => write!(f, "expect"),
            FileState::Exists => write!(f, "exists"),
            FileState::Complete => write!(f, "complete"),
            FileState::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagFile {
    pub filename: String,
    pub state: FileState,
}

/// One task in the graph. Identified by an integer id; carries the
/// category it aggregates under and, after completion, its measurement.
#[derive(Debug, Clone)]
pub struct DagNode {
    pub id: NodeId,
    pub command: String,
    pub category: String,
    pub state: NodeState,
    /// Current rung on the category's allocation ladder.
    pub resource_request: usize,
    pub resources_measured: Option<Summary>,
}

/// State-change record appended to the transaction log. The log is how the
/// runtime (and tests) observe what hooks decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogEvent {
    NodeState { node: NodeId, state: NodeState },
    FileState { filename: String, state: FileState },
}

pub struct Dag {
    workdir: PathBuf,
    nodes: BTreeMap<NodeId, DagNode>,
    files: BTreeMap<String, DagFile>,
    categories: BTreeMap<String, Category>,
    log: Vec<LogEvent>,
}

impl Dag {
    /// A DAG rooted at the given workflow working directory. All relative
    /// artifact paths resolve against it.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            nodes: BTreeMap::new(),
            files: BTreeMap::new(),
            categories: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve a path from the workflow's point of view: absolute paths
    /// pass through, relative ones are joined to the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.workdir.join(p)
        }
    }

    /// Add a node in the `Waiting` state, creating its category on first
    /// use. Re-adding an existing id replaces the node.
    pub fn add_node(&mut self, id: NodeId, command: &str, category: &str) {
        self.categories
            .entry(category.to_string())
            .or_insert_with(|| Category::new(category));
        self.nodes.insert(
            id,
            DagNode {
                id,
                command: command.to_string(),
                category: category.to_string(),
                state: NodeState::Waiting,
                resource_request: 0,
                resources_measured: None,
            },
        );
    }

    pub fn node(&self, id: NodeId) -> Option<&DagNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DagNode> {
        self.nodes.get_mut(&id)
    }

    /// Install a configured category (ladder and all), replacing any
    /// default created by `add_node`.
    pub fn add_category(&mut self, category: Category) {
        self.categories.insert(category.name().to_string(), category);
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// The resource-limit label for a node's current allocation rung, in
    /// the summary syntax. None when the category carries no ladder.
    pub fn dynamic_label(&self, id: NodeId) -> Option<String> {
        let node = self.nodes.get(&id)?;
        let category = self.categories.get(&node.category)?;
        category.allocation(node.resource_request)?.limits_label()
    }

    pub fn file(&self, filename: &str) -> Option<&DagFile> {
        self.files.get(filename)
    }

    /// Look a file up by name, creating it in the `Unknown` state on first
    /// reference. Duplicate declarations merge here, which is what makes
    /// hook file declarations idempotent.
    pub fn file_lookup_or_create(&mut self, filename: &str) -> &mut DagFile {
        self.files
            .entry(filename.to_string())
            .or_insert_with(|| DagFile {
                filename: filename.to_string(),
                state: FileState::Unknown,
            })
    }

    /// Declare a task input, registering the file in the table as well.
    /// Returns the table name.
    pub fn declare_input(
        &mut self,
        task: &mut BatchTask,
        local: &str,
        remote: Option<&str>,
        kind: FileKind,
    ) -> String {
        self.file_lookup_or_create(local);
        task.add_input(local, remote, kind);
        local.to_string()
    }

    /// Declare a task output, registering the file in the table as well.
    pub fn declare_output(
        &mut self,
        task: &mut BatchTask,
        local: &str,
        remote: Option<&str>,
        kind: FileKind,
    ) -> String {
        self.file_lookup_or_create(local);
        task.add_output(local, remote, kind);
        local.to_string()
    }

    /// Record a node state change in the transaction log and apply it.
    pub fn log_node_state(&mut self, id: NodeId, state: NodeState) {
        let Some(node) = self.nodes.get_mut(&id) else {
            warn!("state change for unknown rule {id} dropped");
            return;
        };
        if !node.state.can_transition_to(state) {
            debug!("rule {id}: unusual transition {} -> {state}", node.state);
        }
        node.state = state;
        debug!("rule {id} is now {state}");
        self.log.push(LogEvent::NodeState { node: id, state });
    }

    /// Record a file state change in the transaction log and apply it.
    pub fn log_file_state(&mut self, filename: &str, state: FileState) {
        let file = self.file_lookup_or_create(filename);
        file.state = state;
        debug!("file {filename} is now {state}");
        self.log.push(LogEvent::FileState {
            filename: filename.to_string(),
            state,
        });
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.log
    }
}
