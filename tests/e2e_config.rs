// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Configuration validation at `create`, through the registry so the
//! binary collapse the runtime sees is what gets asserted.

use fm_e2e_tests::{fake_monitor, with_monitor};
use fm_engine::{HookArgs, HookRegistry, ResourceMonitorHook};
use serde_json::json;

fn registry() -> HookRegistry {
    let mut registry = HookRegistry::new();
    registry.register(ResourceMonitorHook::new());
    registry
}

#[test]
fn test_create_succeeds_with_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_monitor(dir.path());
    with_monitor(&exe, || {
        let ok = registry().create(&HookArgs::new(json!({
            "resource_monitor_log_dir": "./logs",
        })));
        assert!(ok, "startup should proceed");
    });
}

#[test]
fn test_create_fails_without_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_monitor(dir.path());
    with_monitor(&exe, || {
        let ok = registry().create(&HookArgs::new(json!({
            "resource_monitor_interval": 5,
        })));
        assert!(!ok, "startup must abort without a log directory");
    });
}

#[test]
fn test_create_fails_with_non_positive_interval() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_monitor(dir.path());
    with_monitor(&exe, || {
        let ok = registry().create(&HookArgs::new(json!({
            "resource_monitor_log_dir": "./logs",
            "resource_monitor_interval": 0,
        })));
        assert!(!ok);
    });
}

#[test]
fn test_create_fails_when_monitor_is_missing() {
    let empty = tempfile::tempdir().unwrap();
    temp_env::with_vars(
        [
            (fm_engine::rmonitor::ENV_OVERRIDE, None),
            ("PATH", Some(empty.path().to_str().unwrap())),
        ],
        || {
            let ok = registry().create(&HookArgs::new(json!({
                "resource_monitor_log_dir": "./logs",
            })));
            assert!(!ok, "startup must abort without a sidecar binary");
        },
    );
}

#[test]
fn test_created_hook_reports_its_settings() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_monitor(dir.path());
    with_monitor(&exe, || {
        use fm_engine::WorkflowHook;
        let mut hook = ResourceMonitorHook::new();
        hook.create(&HookArgs::new(json!({
            "resource_monitor_log_dir": "./logs",
            "resource_monitor_interval": 3,
            "resource_monitor_enable_list_files": 1,
        })))
        .unwrap();

        let config = hook.config().unwrap();
        assert_eq!(config.log_dir, "./logs");
        assert_eq!(config.log_prefix, "./logs/resource-rule-%%");
        assert_eq!(config.interval, 3);
        assert!(config.enable_list_files);
        assert!(!config.enable_time_series);
        assert_eq!(config.exe, exe);

        // destroy releases the settings.
        let mut dag = fm_engine::Dag::new(dir.path());
        hook.destroy(&mut dag).unwrap();
        assert!(hook.config().is_none());
    });
}
