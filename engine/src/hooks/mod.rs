// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Lifecycle hooks for augmenting workflow execution.
//!
//! A hook registers interest in five well-known lifecycle points plus
//! teardown: `create`, `dag_start`, `node_submit`, `node_end`,
//! `node_fail`, and `destroy`. The runtime drives every registered hook
//! serially at each point; a hook reports a typed error and the registry
//! collapses it into the binary success/failure the runtime acts on.

pub mod monitor;

use crate::dag::{Dag, NodeId};
use crate::error::Result;
use crate::queue::BatchQueue;
use crate::task::BatchTask;
use log::error;
use serde_json::Value;

/// Generic key-value argument record handed to hooks at `create`.
#[derive(Debug, Clone)]
pub struct HookArgs(Value);

impl HookArgs {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self(Value::Null)
    }

    pub fn lookup_str(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    pub fn lookup_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key)?.as_i64()
    }

    /// Boolean options arrive as integers in workflow configurations;
    /// genuine booleans are tolerated too. Absent means false.
    pub fn lookup_flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(v) => v.as_i64().unwrap_or(0) != 0,
            None => false,
        }
    }
}

/// A workflow lifecycle hook. Every callback defaults to a no-op so
/// implementations only write the points they care about.
pub trait WorkflowHook {
    fn name(&self) -> &'static str;

    /// Runtime initialization: parse configuration and validate. A
    /// failure here aborts startup.
    fn create(&mut self, _args: &HookArgs) -> Result<()> {
        Ok(())
    }

    /// Runtime teardown.
    fn destroy(&mut self, _dag: &mut Dag) -> Result<()> {
        Ok(())
    }

    /// Before any node is submitted.
    fn dag_start(&mut self, _dag: &mut Dag) -> Result<()> {
        Ok(())
    }

    /// A node is about to be handed to the queue; the hook may rewrite
    /// the task. A failure refuses the submission.
    fn node_submit(
        &mut self,
        _dag: &mut Dag,
        _node: NodeId,
        _task: &mut BatchTask,
        _queue: &BatchQueue,
    ) -> Result<()> {
        Ok(())
    }

    /// The node's batch task completed successfully.
    fn node_end(
        &mut self,
        _dag: &mut Dag,
        _node: NodeId,
        _task: &BatchTask,
        _queue: &BatchQueue,
    ) -> Result<()> {
        Ok(())
    }

    /// The node's batch task failed. Returning Ok leaves the failure to
    /// other hooks; an error makes it authoritative.
    fn node_fail(
        &mut self,
        _dag: &mut Dag,
        _node: NodeId,
        _task: &BatchTask,
        _queue: &BatchQueue,
    ) -> Result<()> {
        Ok(())
    }
}

/// Ordered collection of hooks, driven by the runtime at each lifecycle
/// point. Every hook sees every event even when an earlier one failed;
/// any failure fails the phase.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn WorkflowHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: impl WorkflowHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn run(
        &mut self,
        phase: &str,
        mut body: impl FnMut(&mut Box<dyn WorkflowHook>) -> Result<()>,
    ) -> bool {
        let mut ok = true;
        for hook in &mut self.hooks {
            if let Err(e) = body(hook) {
                error!("[{}] {phase} failed: {e}", hook.name());
                ok = false;
            }
        }
        ok
    }

    pub fn create(&mut self, args: &HookArgs) -> bool {
        self.run("create", |h| h.create(args))
    }

    pub fn destroy(&mut self, dag: &mut Dag) -> bool {
        self.run("destroy", |h| h.destroy(dag))
    }

    pub fn dag_start(&mut self, dag: &mut Dag) -> bool {
        self.run("dag_start", |h| h.dag_start(dag))
    }

    pub fn node_submit(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        task: &mut BatchTask,
        queue: &BatchQueue,
    ) -> bool {
        self.run("node_submit", |h| h.node_submit(dag, node, task, queue))
    }

    pub fn node_end(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        task: &BatchTask,
        queue: &BatchQueue,
    ) -> bool {
        self.run("node_end", |h| h.node_end(dag, node, task, queue))
    }

    pub fn node_fail(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        task: &BatchTask,
        queue: &BatchQueue,
    ) -> bool {
        self.run("node_fail", |h| h.node_fail(dag, node, task, queue))
    }
}
