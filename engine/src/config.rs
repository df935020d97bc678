// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::dag::NodeId;
use crate::error::{HookError, Result};
use crate::hooks::HookArgs;
use crate::queue::{BatchQueue, Feature};
use crate::rmonitor;
use std::path::PathBuf;

pub const DEFAULT_LOG_FORMAT: &str = "resource-rule-%%";

/// Settings for the resource-monitor hook. Populated once at `create`,
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Directory every monitor artifact lands in.
    pub log_dir: String,
    /// Per-node artifact name template; `%%` is replaced by the node id.
    pub log_format: String,
    /// `{log_dir}/{log_format}`, still carrying the `%%` marker.
    pub log_prefix: String,
    /// Sampling period in seconds.
    pub interval: u64,
    pub enable_debug: bool,
    pub enable_time_series: bool,
    pub enable_list_files: bool,
    /// Located sidecar binary on this host.
    pub exe: PathBuf,
    /// Name the sidecar is staged under when the queue can rename.
    pub exe_remote: String,
}

impl MonitorConfig {
    /// Build and validate the configuration from the runtime's generic
    /// argument record. Fails when the log directory is missing, the
    /// interval is not positive, or the sidecar binary cannot be located.
    pub fn from_args(args: &HookArgs) -> Result<Self> {
        let Some(log_dir) = args.lookup_str("resource_monitor_log_dir") else {
            return Err(HookError::Config(
                "monitoring was enabled, but a log output directory was not specified".into(),
            ));
        };

        let log_format = args
            .lookup_str("resource_monitor_log_format")
            .unwrap_or(DEFAULT_LOG_FORMAT)
            .to_string();

        let interval = args.lookup_i64("resource_monitor_interval").unwrap_or(1);
        if interval < 1 {
            return Err(HookError::Config(
                "monitoring interval must be positive".into(),
            ));
        }

        let exe = rmonitor::locate()?;
        let log_prefix = format!("{log_dir}/{log_format}");

        Ok(Self {
            log_dir: log_dir.to_string(),
            log_format,
            log_prefix,
            interval: interval as u64,
            enable_debug: false,
            enable_time_series: args.lookup_flag("resource_monitor_enable_time_series"),
            enable_list_files: args.lookup_flag("resource_monitor_enable_list_files"),
            exe,
            exe_remote: rmonitor::REMOTE_EXECUTABLE.to_string(),
        })
    }

    /// The full artifact prefix for one node. Pure: a fixed config and id
    /// always produce the same string.
    pub fn log_prefix_for_node(&self, id: NodeId) -> String {
        replace_percents(&self.log_prefix, id)
    }

    /// The prefix the sidecar is told to emit under. Queues that do not
    /// preserve output directories only retain basenames on the execution
    /// host, so the directory part is dropped there.
    pub fn output_prefix_for_node(&self, id: NodeId, queue: &BatchQueue) -> String {
        let prefix = self.log_prefix_for_node(id);
        if queue.supports(Feature::OutputDirectories) {
            prefix
        } else {
            basename(&prefix).to_string()
        }
    }
}

/// Replace each `%%` marker with the node's decimal id.
pub fn replace_percents(template: &str, id: NodeId) -> String {
    template.replace("%%", &id.to_string())
}

/// Final path component of a prefix string.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(at) => &path[at + 1..],
        None => path,
    }
}
