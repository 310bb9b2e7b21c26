//! Deadline expiry detection.
//!
//! The monitor has no internal thread. Like the rest of the core it is
//! tick-driven: the caller invokes [`DeadlineMonitor::sweep`] at the
//! configured cadence (1 Hz by default) and feeds the result back into
//! the lifecycle controller as failure intents.
//!
//! A sweep returns a snapshot of expired task ids. Resolving the ids
//! against the live registry afterwards means removals during processing
//! can neither skip nor double-process a task.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::task::TaskRegistry;

/// Default sweep cadence in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

/// Periodic deadline sweep over the task registry.
#[derive(Debug, Clone)]
pub struct DeadlineMonitor {
    sweep_interval: Duration,
}

impl DeadlineMonitor {
    pub fn new() -> Self {
        Self::with_interval_secs(DEFAULT_SWEEP_INTERVAL_SECS)
    }

    pub fn with_interval_secs(secs: u64) -> Self {
        Self {
            // A zero interval would spin; hold the floor at one second.
            sweep_interval: Duration::from_secs(secs.max(1)),
        }
    }

    /// Cadence the caller should drive sweeps at.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Snapshot the ids of all tasks whose deadline is at or before `now`.
    pub fn sweep(&self, registry: &TaskRegistry, now: DateTime<Utc>) -> Vec<Uuid> {
        registry
            .list()
            .iter()
            .filter(|task| task.is_expired(now))
            .map(|task| task.id)
            .collect()
    }
}

impl Default for DeadlineMonitor {
    fn default() -> Self {
        Self::new()
    }
}
