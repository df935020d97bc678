// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Integration points with the sampling sidecar: locating the binary on
//! the submitting host and rendering the command line that runs a task
//! under it.

use crate::error::{HookError, Result};
use log::debug;
use std::path::PathBuf;

/// Binary searched for on `PATH`.
pub const EXECUTABLE: &str = "resource_monitor";

/// Fixed logical name the sidecar is staged under on execution hosts that
/// support renaming.
pub const REMOTE_EXECUTABLE: &str = "cctools-monitor";

/// Environment variable overriding the `PATH` search with an explicit
/// binary path.
pub const ENV_OVERRIDE: &str = "RESOURCE_MONITOR";

/// Exit code the sidecar uses to report that the task broke one of its
/// resource limits.
pub const RM_OVERFLOW: i32 = 147;

/// Locate the sidecar binary: the environment override wins, then the
/// `PATH` search. The result must be an existing regular file.
pub fn locate() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(ENV_OVERRIDE) {
        let path = PathBuf::from(path);
        if path.is_file() {
            debug!("using monitor binary from ${ENV_OVERRIDE}: {}", path.display());
            return Ok(path);
        }
        return Err(HookError::Config(format!(
            "${ENV_OVERRIDE} points at {}, which is not a file",
            path.display()
        )));
    }

    which::which(EXECUTABLE).map_err(|_| {
        HookError::Config(format!("could not find {EXECUTABLE} in PATH"))
    })
}

/// Inputs to the sidecar command writer. `render` produces a shell
/// command ending in `-- {}`; the task's own command is substituted for
/// the placeholder by the wrapping step.
#[derive(Debug)]
pub struct MonitorCommand<'a> {
    pub executable: &'a str,
    pub output_prefix: &'a str,
    /// Sampling period, seconds.
    pub interval: u64,
    /// Resource-limit fragment for `-L`, when the category carries one.
    pub limits: Option<&'a str>,
    /// Pre-rendered extra options, e.g. `-V 'category:sim'`.
    pub extra_options: &'a str,
    pub debug: bool,
    pub time_series: bool,
    pub file_lists: bool,
}

impl MonitorCommand<'_> {
    pub fn render(&self) -> String {
        let mut cmd = String::from(self.executable);
        if self.debug {
            cmd.push_str(" --debug");
        }
        if self.time_series {
            cmd.push_str(" --with-time-series");
        }
        if self.file_lists {
            cmd.push_str(" --with-file-lists");
        }
        cmd.push_str(&format!(" -i {}", self.interval));
        cmd.push_str(&format!(" -o {}", self.output_prefix));
        if !self.extra_options.is_empty() {
            cmd.push(' ');
            cmd.push_str(self.extra_options);
        }
        if let Some(limits) = self.limits {
            cmd.push_str(&format!(" -L '{limits}'"));
        }
        cmd.push_str(" -- {}");
        cmd
    }
}
