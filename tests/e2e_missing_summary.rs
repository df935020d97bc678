// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! A task that succeeds without leaving a summary behind: the measurement
//! is lost, but the node's success must stand.

use fm_e2e_tests::{created_hook, one_node_dag, scenario_args, write_artifact};
use fm_engine::{BatchQueue, BatchTask, WorkflowHook};

#[test]
fn test_missing_summary_keeps_node_successful() {
    let workdir = tempfile::tempdir().unwrap();
    let mut hook = created_hook(workdir.path(), scenario_args());
    let mut dag = one_node_dag(workdir.path(), 7);
    let queue = BatchQueue::new("cluster");

    hook.dag_start(&mut dag).unwrap();
    let mut task = BatchTask::new("/bin/echo hello");
    hook.node_submit(&mut dag, 7, &mut task, &queue).unwrap();

    // No artifacts were written. node_end still reports success.
    hook.node_end(&mut dag, 7, &task, &queue).unwrap();

    assert!(dag.node(7).unwrap().resources_measured.is_none());
    assert_eq!(dag.category("c1").unwrap().stats().count, 0);
    assert!(!workdir.path().join("logs/r-7.summary").exists());
}

#[test]
fn test_malformed_summary_keeps_node_successful() {
    let workdir = tempfile::tempdir().unwrap();
    let mut hook = created_hook(workdir.path(), scenario_args());
    let mut dag = one_node_dag(workdir.path(), 7);
    let queue = BatchQueue::new("cluster");

    hook.dag_start(&mut dag).unwrap();
    let mut task = BatchTask::new("/bin/echo hello");
    hook.node_submit(&mut dag, 7, &mut task, &queue).unwrap();
    write_artifact(workdir.path(), "r-7.summary", "not: valid: yaml: [");

    hook.node_end(&mut dag, 7, &task, &queue).unwrap();

    assert!(dag.node(7).unwrap().resources_measured.is_none());
    // Nothing was relocated either: the malformed file stays put.
    assert!(workdir.path().join("r-7.summary").exists());
    assert!(!workdir.path().join("logs/r-7.summary").exists());
}

#[test]
fn test_summary_present_but_series_lost_fails_the_node() {
    let workdir = tempfile::tempdir().unwrap();
    let mut hook = created_hook(workdir.path(), scenario_args());
    let mut dag = one_node_dag(workdir.path(), 7);
    let queue = BatchQueue::new("cluster");

    hook.dag_start(&mut dag).unwrap();
    let mut task = BatchTask::new("/bin/echo hello");
    hook.node_submit(&mut dag, 7, &mut task, &queue).unwrap();

    // The summary parsed, so relocation runs; the missing series file is
    // a broken sidecar run and fails the node.
    write_artifact(workdir.path(), "r-7.summary", "memory: 45 MB\n");

    assert!(hook.node_end(&mut dag, 7, &task, &queue).is_err());
}
