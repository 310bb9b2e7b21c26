//! SQLite-backed persistent key-value store.
//!
//! Holds the durable application state under string keys:
//! - `tasks`: JSON array of tasks
//! - `points`, `health`, `streak`: stringified integers
//! - `lastCompletionDate`: day string, or empty
//! - `logs`: JSON array of log entries
//! - `experimentGroup`: cohort label, written by the setup flow
//!
//! Reads degrade: a missing or corrupt value loads as "no prior state"
//! and falls back to the configured defaults. Writes go through
//! [`Store::commit_state`], which stages the full new state in a single
//! transaction.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use super::config::ScoringConfig;
use super::data_dir;
use crate::error::{CoreError, StoreError};
use crate::events::{LogEntry, DEFAULT_GROUP};
use crate::score::ScoreState;
use crate::task::Task;

/// Storage keys for the durable state.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const POINTS: &str = "points";
    pub const HEALTH: &str = "health";
    pub const STREAK: &str = "streak";
    pub const LAST_COMPLETION_DATE: &str = "lastCompletionDate";
    pub const LOGS: &str = "logs";
    pub const EXPERIMENT_GROUP: &str = "experimentGroup";
}

/// SQLite database holding the key-value state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/taskpet/taskpet.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("taskpet.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the persisted task list. Missing or corrupt JSON loads as
    /// an empty list.
    pub fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .kv_get(keys::TASKS)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Load the persisted score state, falling back to the configured
    /// first-run defaults per field.
    pub fn load_score(&self, defaults: &ScoringConfig) -> Result<ScoreState, StoreError> {
        let points = self
            .kv_get(keys::POINTS)?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.initial_points);
        let health = self
            .kv_get(keys::HEALTH)?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.initial_health);
        let streak = self
            .kv_get(keys::STREAK)?
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let last_completion_date = self
            .kv_get(keys::LAST_COMPLETION_DATE)?
            .filter(|v| !v.is_empty());

        Ok(ScoreState {
            points,
            health,
            streak,
            last_completion_date,
        })
    }

    /// Load the persisted event log. Missing or corrupt JSON loads as
    /// an empty log.
    pub fn load_logs(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self
            .kv_get(keys::LOGS)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Current experiment group label, `"unknown"` when unset.
    pub fn experiment_group(&self) -> Result<String, StoreError> {
        Ok(self
            .kv_get(keys::EXPERIMENT_GROUP)?
            .unwrap_or_else(|| DEFAULT_GROUP.to_string()))
    }

    /// Assign the experiment group. Owned by the external setup flow;
    /// the lifecycle core only ever reads it.
    pub fn set_experiment_group(&self, group: &str) -> Result<(), StoreError> {
        self.kv_set(keys::EXPERIMENT_GROUP, group)
    }

    /// Write the full domain state in one transaction.
    ///
    /// Either every key reflects the new state or none does, so a failed
    /// commit leaves the previous durable snapshot intact.
    pub fn commit_state(
        &mut self,
        tasks: &[Task],
        score: &ScoreState,
        logs: &[LogEntry],
    ) -> Result<(), CoreError> {
        let tasks_json = serde_json::to_string(tasks)?;
        let logs_json = serde_json::to_string(logs)?;
        let points = score.points.to_string();
        let health = score.health.to_string();
        let streak = score.streak.to_string();
        let last_completion = score.last_completion_date.clone().unwrap_or_default();

        let tx = self.conn.transaction().map_err(StoreError::from)?;
        let pairs: [(&str, &str); 6] = [
            (keys::TASKS, &tasks_json),
            (keys::POINTS, &points),
            (keys::HEALTH, &health),
            (keys::STREAK, &streak),
            (keys::LAST_COMPLETION_DATE, &last_completion),
            (keys::LOGS, &logs_json),
        ];
        for (key, value) in pairs {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(StoreError::from)?;
        }
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventDetails, EventLog, EventType};
    use crate::task::TaskRegistry;

    #[test]
    fn kv_roundtrip() {
        let store = Store::open_memory().unwrap();
        assert!(store.kv_get("test").unwrap().is_none());
        store.kv_set("test", "hello").unwrap();
        assert_eq!(store.kv_get("test").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn missing_state_loads_defaults() {
        let store = Store::open_memory().unwrap();
        let defaults = ScoringConfig::default();

        assert!(store.load_tasks().unwrap().is_empty());
        assert!(store.load_logs().unwrap().is_empty());
        assert_eq!(store.experiment_group().unwrap(), "unknown");

        let score = store.load_score(&defaults).unwrap();
        assert_eq!(score.points, 50);
        assert_eq!(score.health, 100);
        assert_eq!(score.streak, 0);
        assert!(score.last_completion_date.is_none());
    }

    #[test]
    fn corrupt_values_load_as_no_prior_state() {
        let store = Store::open_memory().unwrap();
        store.kv_set(keys::TASKS, "{not json").unwrap();
        store.kv_set(keys::LOGS, "broken").unwrap();
        store.kv_set(keys::POINTS, "NaN").unwrap();
        store.kv_set(keys::LAST_COMPLETION_DATE, "").unwrap();

        let defaults = ScoringConfig::default();
        assert!(store.load_tasks().unwrap().is_empty());
        assert!(store.load_logs().unwrap().is_empty());
        let score = store.load_score(&defaults).unwrap();
        assert_eq!(score.points, 50);
        assert!(score.last_completion_date.is_none());
    }

    #[test]
    fn commit_state_roundtrip() {
        let mut store = Store::open_memory().unwrap();
        let mut registry = TaskRegistry::new();
        registry.create("persist me", None).unwrap();
        let mut log = EventLog::new();
        log.append(
            EventType::TaskCreated,
            "control",
            EventDetails::created("persist me", 1),
        );
        let score = ScoreState {
            points: 60,
            health: 95,
            streak: 2,
            last_completion_date: Some("2026-08-06".to_string()),
        };

        store
            .commit_state(registry.list(), &score, log.entries())
            .unwrap();

        assert_eq!(store.load_tasks().unwrap(), registry.list());
        assert_eq!(store.load_logs().unwrap(), log.entries());
        let loaded = store.load_score(&ScoringConfig::default()).unwrap();
        assert_eq!(loaded, score);
        assert_eq!(
            store.kv_get(keys::LAST_COMPLETION_DATE).unwrap().as_deref(),
            Some("2026-08-06")
        );
    }

    #[test]
    fn experiment_group_assignment() {
        let store = Store::open_memory().unwrap();
        store.set_experiment_group("treatment").unwrap();
        assert_eq!(store.experiment_group().unwrap(), "treatment");
    }
}
