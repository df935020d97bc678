// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! The resource-monitor hook: wraps every submitted rule in the sampling
//! sidecar, ingests the measurements it emits, and escalates a rule's
//! allocation along its category ladder when a run overflows.

use crate::config::{self, MonitorConfig};
use crate::dag::{Dag, FileState, NodeId, NodeState};
use crate::error::{HookError, Result};
use crate::hooks::{HookArgs, WorkflowHook};
use crate::queue::{BatchQueue, Feature};
use crate::rmonitor::{self, MonitorCommand};
use crate::summary::Summary;
use crate::task::{BatchTask, FileKind};
use crate::wrapper::BatchWrapper;
use log::{debug, warn};
use std::fs;
use std::io;

pub struct ResourceMonitorHook {
    config: Option<MonitorConfig>,
}

impl ResourceMonitorHook {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn config(&self) -> Option<&MonitorConfig> {
        self.config.as_ref()
    }

    /// Move sidecar outputs from their basename landing spot into the
    /// configured log directory. A no-op when the queue preserves output
    /// directories, or when the two locations coincide. A failed rename
    /// after a successful run means the sidecar did not produce what it
    /// promised, which fails the node.
    pub fn move_output_if_needed(
        &self,
        dag: &Dag,
        node: NodeId,
        queue: &BatchQueue,
    ) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Ok(());
        };
        if queue.supports(Feature::OutputDirectories) {
            return Ok(());
        }

        let log_prefix = config.log_prefix_for_node(node);
        let output_prefix = config::basename(&log_prefix);
        if output_prefix == log_prefix {
            return Ok(());
        }

        relocate(dag, output_prefix, &log_prefix, ".summary")?;
        if config.enable_time_series {
            relocate(dag, output_prefix, &log_prefix, ".series")?;
        }
        if config.enable_list_files {
            relocate(dag, output_prefix, &log_prefix, ".files")?;
        }
        Ok(())
    }
}

fn relocate(dag: &Dag, from_prefix: &str, to_prefix: &str, ext: &str) -> Result<()> {
    let from = format!("{from_prefix}{ext}");
    let to = format!("{to_prefix}{ext}");
    fs::rename(dag.resolve(&from), dag.resolve(&to))
        .map_err(|source| HookError::Relocation { from, to, source })
}

impl WorkflowHook for ResourceMonitorHook {
    fn name(&self) -> &'static str {
        "resource-monitor"
    }

    fn create(&mut self, args: &HookArgs) -> Result<()> {
        self.config = Some(MonitorConfig::from_args(args)?);
        Ok(())
    }

    fn destroy(&mut self, _dag: &mut Dag) -> Result<()> {
        self.config = None;
        Ok(())
    }

    fn dag_start(&mut self, dag: &mut Dag) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Ok(());
        };

        dag.file_lookup_or_create(&config.exe.display().to_string());

        let dir = dag.resolve(&config.log_dir);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Err(e) = fs::create_dir_all(&dir) {
                    warn!(
                        "could not create monitor output directory {}: {e}",
                        dir.display()
                    );
                }
            }
            Err(e) => warn!(
                "could not create monitor output directory {}: {e}",
                dir.display()
            ),
        }

        // Success is the directory existing afterwards, no matter which
        // create call put it there.
        if dir.is_dir() {
            dag.log_file_state(&config.log_dir, FileState::Exists);
        }

        Ok(())
    }

    fn node_submit(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        task: &mut BatchTask,
        queue: &BatchQueue,
    ) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Ok(());
        };

        let mut wrapper = BatchWrapper::new("./resource_monitor");

        // The sidecar is a global input: staged once, reused by every node.
        let exe_local = config.exe.display().to_string();
        dag.declare_input(task, &exe_local, Some(&config.exe_remote), FileKind::Global);

        let executable = if queue.supports(Feature::RemoteRename) {
            format!("./{}", config.exe_remote)
        } else {
            exe_local.clone()
        };

        let log_prefix = config.log_prefix_for_node(node);
        dag.declare_output(
            task,
            &format!("{log_prefix}.summary"),
            None,
            FileKind::Intermediate,
        );
        if config.enable_time_series {
            dag.declare_output(
                task,
                &format!("{log_prefix}.series"),
                None,
                FileKind::Intermediate,
            );
        }
        if config.enable_list_files {
            dag.declare_output(
                task,
                &format!("{log_prefix}.files"),
                None,
                FileKind::Intermediate,
            );
        }

        let Some(n) = dag.node(node) else {
            warn!("submit for unknown rule {node}");
            return Ok(());
        };
        let extra_options = format!("-V 'category:{}'", n.category);
        let limits = dag.dynamic_label(node);
        let output_prefix = config.output_prefix_for_node(node, queue);

        let cmd = MonitorCommand {
            executable: &executable,
            output_prefix: &output_prefix,
            interval: config.interval,
            limits: limits.as_deref(),
            extra_options: &extra_options,
            debug: config.enable_debug,
            time_series: config.enable_time_series,
            file_lists: config.enable_list_files,
        }
        .render();

        // The previous command survives as the inner operand, so other
        // wrapping hooks nest around this one predictably.
        task.wrap_command(&cmd);
        wrapper.cmd(&task.command);

        let script = wrapper.write(dag.workdir(), node)?;
        task.set_command(script.clone());
        dag.declare_input(task, &script, Some(&script), FileKind::Temp);
        debug!("wrapper written to {script}");
        dag.log_file_state(&script, FileState::Exists);

        Ok(())
    }

    fn node_end(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        _task: &BatchTask,
        queue: &BatchQueue,
    ) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Ok(());
        };

        let output_prefix = config.output_prefix_for_node(node, queue);
        let summary_path = dag.resolve(&format!("{output_prefix}.summary"));

        let summary = match Summary::parse_file(&summary_path) {
            Ok(summary) => summary,
            Err(e) => {
                // The rule itself completed; a lost measurement must not
                // cascade into a workflow abort.
                warn!("monitor failed to measure rule {node}: {e:#}");
                return Ok(());
            }
        };

        let category = dag.node(node).map(|n| n.category.clone());
        if let Some(name) = category
            && let Some(category) = dag.category_mut(&name)
        {
            category.accumulate(&summary);
        }
        if let Some(n) = dag.node_mut(node) {
            n.resources_measured = Some(summary);
        }

        self.move_output_if_needed(dag, node, queue)
    }

    fn node_fail(
        &mut self,
        dag: &mut Dag,
        node: NodeId,
        task: &BatchTask,
        _queue: &BatchQueue,
    ) -> Result<()> {
        if self.config.is_none() {
            return Ok(());
        }
        let Some(n) = dag.node(node) else {
            return Ok(());
        };

        if task.info.disk_allocation_exhausted {
            eprintln!("\nrule {node} failed because it exceeded its disk allocation capacity.");
            if let Some(measured) = &n.resources_measured {
                eprintln!("{measured}");
            }
        } else if task.info.exit_code == Some(rmonitor::RM_OVERFLOW) {
            debug!("rule {node} failed because it exceeded its resource limits");
            if let Some(limits) = n
                .resources_measured
                .as_ref()
                .and_then(|m| m.limits_exceeded.as_deref())
            {
                debug!("limits exceeded:\n{limits}");
            }
        } else {
            // Not a monitoring failure; some other hook's business.
            return Ok(());
        }

        let next = dag
            .category(&n.category)
            .and_then(|c| c.next_label(n.resource_request, n.resources_measured.as_ref()));

        match next {
            Some(rung) => {
                debug!("rule {node} resubmitted using new resource allocation");
                if let Some(n) = dag.node_mut(node) {
                    n.resource_request = rung;
                }
                dag.log_node_state(node, NodeState::Waiting);
                Err(HookError::Overflow { node })
            }
            None => Err(HookError::AllocationExhausted { node }),
        }
    }
}
