// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Decoder for the sidecar's `.summary` artifact: a textual record of one
//! `key: value` pair per line, with an optional unit suffix on values
//! (`memory: 45 MB`, `wall_time: 1.234 s`) and an optional nested
//! `limits_exceeded` sub-record naming the resources that overflowed.
//!
//! Times are seconds, memory and disk are MB, I/O totals are bytes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Measured resource consumption of a single completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Summary {
    pub command: Option<String>,
    pub cores: Option<f64>,
    pub wall_time: Option<f64>,
    pub cpu_time: Option<f64>,
    pub memory: Option<u64>,
    pub virtual_memory: Option<u64>,
    pub disk: Option<u64>,
    pub bytes_read: Option<u64>,
    pub bytes_written: Option<u64>,
    pub limits_exceeded: Option<Box<Summary>>,
}

impl Summary {
    pub fn parse_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a summary record. Unknown keys are ignored so newer sidecars
    /// can add fields without breaking older consumers.
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).context("summary is not a readable record")?;
        let mapping = value
            .as_mapping()
            .context("summary is not a key/value record")?;
        Ok(Self::from_mapping(mapping))
    }

    fn from_mapping(mapping: &serde_yaml::Mapping) -> Self {
        let mut summary = Summary::default();
        for (key, value) in mapping {
            let Some(key) = key.as_str() else { continue };
            match key {
                "command" => summary.command = value.as_str().map(str::to_string),
                "cores" => summary.cores = scalar(value),
                "wall_time" => summary.wall_time = scalar(value),
                "cpu_time" => summary.cpu_time = scalar(value),
                "memory" => summary.memory = scalar(value).map(|v| v as u64),
                "virtual_memory" => summary.virtual_memory = scalar(value).map(|v| v as u64),
                "disk" => summary.disk = scalar(value).map(|v| v as u64),
                "bytes_read" => summary.bytes_read = scalar(value).map(|v| v as u64),
                "bytes_written" => summary.bytes_written = scalar(value).map(|v| v as u64),
                "limits_exceeded" => {
                    summary.limits_exceeded = value
                        .as_mapping()
                        .map(|m| Box::new(Self::from_mapping(m)));
                }
                _ => {}
            }
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref command) = self.command {
            writeln!(f, "command: {command}")?;
        }
        if let Some(cores) = self.cores {
            writeln!(f, "cores: {cores}")?;
        }
        if let Some(wall_time) = self.wall_time {
            writeln!(f, "wall_time: {wall_time} s")?;
        }
        if let Some(cpu_time) = self.cpu_time {
            writeln!(f, "cpu_time: {cpu_time} s")?;
        }
        if let Some(memory) = self.memory {
            writeln!(f, "memory: {memory} MB")?;
        }
        if let Some(virtual_memory) = self.virtual_memory {
            writeln!(f, "virtual_memory: {virtual_memory} MB")?;
        }
        if let Some(disk) = self.disk {
            writeln!(f, "disk: {disk} MB")?;
        }
        if let Some(bytes_read) = self.bytes_read {
            writeln!(f, "bytes_read: {bytes_read} B")?;
        }
        if let Some(bytes_written) = self.bytes_written {
            writeln!(f, "bytes_written: {bytes_written} B")?;
        }
        Ok(())
    }
}

/// Numeric scalar, tolerating a trailing unit token.
fn scalar(value: &serde_yaml::Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let s = value.as_str()?;
    s.split_whitespace().next()?.parse().ok()
}
