// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::dag::NodeId;
use thiserror::Error;

/// Typed failure carried out of a hook callback. The registry collapses
/// these into the binary outcome the runtime understands; the variant only
/// matters for logging and for tests.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write wrapper script: {0}")]
    Wrap(#[from] std::io::Error),

    #[error("failed to relocate monitor output {from} -> {to}: {source}")]
    Relocation {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    /// Rule overflowed its allocation and was re-queued with a larger one.
    /// Still a failure for the current task attempt.
    #[error("rule {node} exceeded its resource allocation")]
    Overflow { node: NodeId },

    /// Rule overflowed and the category ladder has no larger allocation
    /// left. The node stays failed.
    #[error("rule {node} exhausted the allocation ladder")]
    AllocationExhausted { node: NodeId },
}

pub type Result<T> = std::result::Result<T, HookError>;
