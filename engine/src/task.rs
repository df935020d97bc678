// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use serde::{Deserialize, Serialize};

/// How the runtime treats a file declared on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// Staged once and reused across every task that declares it.
    Global,
    /// Product of one rule, consumed by others; deletable once consumers
    /// finish.
    Intermediate,
    /// Runtime-managed scratch; the runtime owns cleanup.
    Temp,
}

/// A file declared as an input or output of a batch task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFile {
    /// Name on the submitting host.
    pub local: String,
    /// Name on the execution host, when the queue can rename.
    pub remote: Option<String>,
    pub kind: FileKind,
}

/// Completion report for a finished task attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub exit_code: Option<i32>,
    pub disk_allocation_exhausted: bool,
}

/// The unit handed to a batch queue: one command plus its declared files.
#[derive(Debug, Clone)]
pub struct BatchTask {
    pub command: String,
    pub inputs: Vec<TaskFile>,
    pub outputs: Vec<TaskFile>,
    pub info: TaskInfo,
}

impl BatchTask {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            info: TaskInfo::default(),
        }
    }

    /// Declare an input file. Re-declaring the same local name is legal
    /// and merged, so hooks may declare without checking.
    pub fn add_input(&mut self, local: &str, remote: Option<&str>, kind: FileKind) {
        if self.inputs.iter().any(|f| f.local == local) {
            return;
        }
        self.inputs.push(TaskFile {
            local: local.to_string(),
            remote: remote.map(str::to_string),
            kind,
        });
    }

    /// Declare an output file. Duplicates merge as for inputs.
    pub fn add_output(&mut self, local: &str, remote: Option<&str>, kind: FileKind) {
        if self.outputs.iter().any(|f| f.local == local) {
            return;
        }
        self.outputs.push(TaskFile {
            local: local.to_string(),
            remote: remote.map(str::to_string),
            kind,
        });
    }

    /// Wrap the current command inside `wrapper`. The first `{}` in the
    /// wrapper text is replaced by the current command; with no
    /// placeholder the current command is appended. The old command always
    /// survives as the inner operand, so wrapping hooks nest predictably.
    pub fn wrap_command(&mut self, wrapper: &str) {
        self.command = match wrapper.find("{}") {
            Some(at) => {
                let mut wrapped = String::with_capacity(wrapper.len() + self.command.len());
                wrapped.push_str(&wrapper[..at]);
                wrapped.push_str(&self.command);
                wrapped.push_str(&wrapper[at + 2..]);
                wrapped
            }
            None => format!("{wrapper} {}", self.command),
        };
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }
}
