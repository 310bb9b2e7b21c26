//! Task model and registry.
//!
//! Tasks carry a stable generated id alongside their position in the
//! registry. Positional indices are only an entry point for the
//! presentation layer; every removal resolves by identity so that a
//! stale index can never act on the wrong task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;

/// A user-defined to-do item with an optional deadline.
///
/// Tasks are never mutated in place: they are created by
/// [`TaskRegistry::create`] and leave the registry on completion,
/// failure, or deadline expiry.
///
/// The persisted form keeps the storage contract's camelCase keys and
/// epoch-millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity, generated at creation.
    pub id: Uuid,
    /// User-supplied description, non-empty.
    pub text: String,
    /// Absolute deadline; `None` means no expiry.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub deadline: Option<DateTime<Utc>>,
    /// Creation timestamp, immutable.
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    fn new(text: String, deadline: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            deadline,
            created_at: Utc::now(),
        }
    }

    /// Whether the deadline has elapsed at `now`.
    ///
    /// Always `false` for tasks without a deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Time left until the deadline, floored to whole hours and minutes.
    ///
    /// `None` when the task has no deadline or the deadline has already
    /// elapsed; expiry is the monitor's branch, never a negative display.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<TimeRemaining> {
        let deadline = self.deadline?;
        let diff = deadline.signed_duration_since(now);
        if diff.num_milliseconds() <= 0 {
            return None;
        }
        Some(TimeRemaining {
            hours: diff.num_hours(),
            minutes: diff.num_minutes() % 60,
        })
    }
}

/// Remaining time until a deadline, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time left: {}h {}m", self.hours, self.minutes)
    }
}

/// Ordered collection of pending tasks.
///
/// Owns the task sequence exclusively. New tasks append at the tail.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted tasks.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Create a task and append it at the tail of the sequence.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyText`] if `text` is empty after
    /// trimming whitespace.
    pub fn create(
        &mut self,
        text: &str,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Task, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let task = Task::new(text.to_string(), deadline);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove the task at `index`, returning it for logging and display.
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfBounds`] if `index` is not a
    /// currently valid position.
    pub fn remove_at(&mut self, index: usize) -> Result<Task, ValidationError> {
        if index >= self.tasks.len() {
            return Err(ValidationError::OutOfBounds {
                index,
                len: self.tasks.len(),
            });
        }
        Ok(self.tasks.remove(index))
    }

    /// Remove a task by identity. `None` if the id is no longer present.
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(position))
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get_by_id(id).is_some()
    }

    /// Read-only view of the ordered sequence.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn create_appends_at_tail() {
        let mut registry = TaskRegistry::new();
        registry.create("first", None).unwrap();
        registry.create("second", None).unwrap();

        let texts: Vec<_> = registry.list().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn create_trims_whitespace() {
        let mut registry = TaskRegistry::new();
        let task = registry.create("  write tests  ", None).unwrap();
        assert_eq!(task.text, "write tests");
    }

    #[test]
    fn create_rejects_empty_text() {
        let mut registry = TaskRegistry::new();
        assert!(matches!(
            registry.create("   ", None),
            Err(ValidationError::EmptyText)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_at_out_of_bounds() {
        let mut registry = TaskRegistry::new();
        registry.create("only", None).unwrap();

        let err = registry.remove_at(3).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfBounds { index: 3, len: 1 }
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_by_id_survives_reordering() {
        let mut registry = TaskRegistry::new();
        let a = registry.create("a", None).unwrap();
        let b = registry.create("b", None).unwrap();
        let c = registry.create("c", None).unwrap();

        // Removing an earlier task shifts positions but not identity.
        registry.remove_by_id(a.id).unwrap();
        let removed = registry.remove_by_id(c.id).unwrap();
        assert_eq!(removed.text, "c");
        assert_eq!(registry.list()[0].id, b.id);
        assert!(registry.remove_by_id(c.id).is_none());
    }

    #[test]
    fn time_remaining_floors_hours_and_minutes() {
        let mut registry = TaskRegistry::new();
        let now = Utc::now();
        let task = registry
            .create("due soon", Some(now + Duration::minutes(90) + Duration::seconds(30)))
            .unwrap();

        let remaining = task.time_remaining(now).unwrap();
        assert_eq!(remaining.hours, 1);
        assert_eq!(remaining.minutes, 30);
        assert_eq!(remaining.to_string(), "Time left: 1h 30m");
    }

    #[test]
    fn time_remaining_never_negative() {
        let mut registry = TaskRegistry::new();
        let now = Utc::now();
        let expired = registry
            .create("late", Some(now - Duration::minutes(5)))
            .unwrap();
        let no_deadline = registry.create("whenever", None).unwrap();

        assert!(expired.time_remaining(now).is_none());
        assert!(expired.is_expired(now));
        assert!(no_deadline.time_remaining(now).is_none());
        assert!(!no_deadline.is_expired(now));
    }

    #[test]
    fn wire_format_keeps_original_keys() {
        let mut registry = TaskRegistry::new();
        let now = Utc::now();
        registry.create("persisted", Some(now + Duration::hours(1))).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(registry.list()).unwrap()).unwrap();
        let entry = &value[0];
        assert!(entry["id"].is_string());
        assert_eq!(entry["text"], "persisted");
        assert!(entry["deadline"].is_i64());
        assert!(entry["createdAt"].is_i64());
    }

    #[test]
    fn wire_format_roundtrip() {
        let mut registry = TaskRegistry::new();
        registry.create("keep me", None).unwrap();
        let json = serde_json::to_string(registry.list()).unwrap();

        let tasks: Vec<Task> = serde_json::from_str(&json).unwrap();
        let restored = TaskRegistry::from_tasks(tasks);
        assert_eq!(restored.list(), registry.list());
    }
}
