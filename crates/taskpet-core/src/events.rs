//! Append-only event log for experiment instrumentation.
//!
//! Every domain action produces a [`LogEntry`] stamped with the capture
//! time and the experiment group in effect. Entries are never mutated or
//! removed except by the explicit [`EventLog::reset`] operation.
//!
//! The serialized form keeps the exported document's original field
//! names (`eventType`, `remainingTasks`, ...) so downstream cohort
//! analysis keeps working on the same schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::ScoreState;

/// Group label used when no experiment assignment is stored.
pub const DEFAULT_GROUP: &str = "unknown";

/// Fixed set of loggable domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    TaskCreated,
    TaskCompleted,
    TaskFailed,
    TaskDeadlineReached,
}

/// Event-specific payload fields, flattened into the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDetails {
    /// Task text the event refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Points after the event was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    /// Health after the event was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i64>,
    /// Pending tasks at capture time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_tasks: Option<usize>,
    /// Total tasks after a creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<usize>,
}

impl EventDetails {
    /// Details for a `task_created` entry.
    pub fn created(task_text: &str, total_tasks: usize) -> Self {
        Self {
            task: Some(task_text.to_string()),
            total_tasks: Some(total_tasks),
            ..Default::default()
        }
    }

    /// Details for an outcome entry: task text, resulting score fields,
    /// and the remaining-task count.
    pub fn outcome(task_text: &str, score: &ScoreState, remaining_tasks: usize) -> Self {
        Self {
            task: Some(task_text.to_string()),
            points: Some(score.points),
            health: Some(score.health),
            remaining_tasks: Some(remaining_tasks),
            ..Default::default()
        }
    }
}

/// One logged domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub event_type: EventType,
    /// Capture time, serialized as an ISO-8601 string.
    pub timestamp: DateTime<Utc>,
    /// Experiment group label in effect at log time.
    pub group: String,
    #[serde(flatten)]
    pub details: EventDetails,
}

/// Append-only record of domain events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry stamped with the current time.
    pub fn append(&mut self, event_type: EventType, group: &str, details: EventDetails) {
        self.entries.push(LogEntry {
            event_type,
            timestamp: Utc::now(),
            group: group.to_string(),
            details,
        });
    }

    /// Serialize the full entry sequence, pretty-printed with 2-space
    /// indentation. A pure read.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Replace the log with an empty sequence. Irreversible.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
