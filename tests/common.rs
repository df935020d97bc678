// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Shared helpers for the end-to-end tests.
//!
//! Each test builds a workflow rooted in its own temporary directory and
//! installs a fake sidecar binary, advertised to the hook through the
//! `RESOURCE_MONITOR` override so no real monitor needs to be on `PATH`.
//! Sidecar output is simulated by writing summary files where a real run
//! would leave them.

use fm_engine::{Dag, HookArgs, ResourceMonitorHook, WorkflowHook};
use std::path::{Path, PathBuf};

/// Install a fake sidecar binary in `dir` and return its path.
pub fn fake_monitor(dir: &Path) -> PathBuf {
    let path = dir.join("resource_monitor");
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    path
}

/// Run `body` with the sidecar override pointing at `exe`.
pub fn with_monitor<R>(exe: &Path, body: impl FnOnce() -> R) -> R {
    temp_env::with_var(fm_engine::rmonitor::ENV_OVERRIDE, Some(exe), body)
}

/// A hook that has already gone through `create` with the given argument
/// record, against a fake sidecar installed in `workdir`.
pub fn created_hook(workdir: &Path, args: serde_json::Value) -> ResourceMonitorHook {
    let exe = fake_monitor(workdir);
    let mut hook = ResourceMonitorHook::new();
    with_monitor(&exe, || {
        hook.create(&HookArgs::new(args)).expect("hook create");
    });
    hook
}

/// The configuration most scenarios run under: `./logs` output, `r-%%`
/// naming, five-second sampling, time series on, file lists off.
pub fn scenario_args() -> serde_json::Value {
    serde_json::json!({
        "resource_monitor_log_dir": "./logs",
        "resource_monitor_log_format": "r-%%",
        "resource_monitor_interval": 5,
        "resource_monitor_enable_time_series": 1,
        "resource_monitor_enable_list_files": 0,
    })
}

/// A one-node DAG for the given rule id, category `c1`.
pub fn one_node_dag(workdir: &Path, node: u64) -> Dag {
    let mut dag = Dag::new(workdir);
    dag.add_node(node, "/bin/echo hello", "c1");
    dag
}

/// Simulate the sidecar leaving an artifact behind.
pub fn write_artifact(workdir: &Path, name: &str, contents: &str) {
    std::fs::write(workdir.join(name), contents).unwrap();
}

/// The wrapper script `node_submit` generated for a rule.
pub fn wrapper_script(workdir: &Path, node: u64) -> String {
    std::fs::read_to_string(workdir.join(format!("resource_monitor_{node}.sh"))).unwrap()
}
