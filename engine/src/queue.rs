// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::HashSet;
use std::fmt;

/// Optional behaviors a batch queue may advertise. Hooks probe these
/// instead of switching on the queue implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Input files can be staged under a different name on the execution
    /// host.
    RemoteRename,
    /// Output files written under a directory path are preserved at that
    /// path; without this, only basenames survive on the execution host.
    OutputDirectories,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::RemoteRename => write!(f, "remote_rename"),
            Feature::OutputDirectories => write!(f, "output_directories"),
        }
    }
}

/// A batch execution substrate behind a capability-advertising interface.
#[derive(Debug, Clone)]
pub struct BatchQueue {
    kind: String,
    features: HashSet<Feature>,
}

impl BatchQueue {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            features: HashSet::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}
