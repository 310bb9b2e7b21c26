//! Lifecycle orchestration for task intents.
//!
//! The controller is the single context object coordinating the three
//! state owners (task registry, score engine, event log) and the
//! persistent store. Each intent -- create, complete, fail, deadline
//! expiry -- runs the same four phases before returning to the caller:
//!
//! ```text
//! REQUESTED -> APPLIED -> LOGGED -> PERSISTED
//! ```
//!
//! Persistence stages the full new state (tasks + score + log) and
//! commits it in one transaction, so the durable snapshot is always
//! internally consistent. If the commit fails the in-memory mutation has
//! already happened and is not rolled back; the error is surfaced to the
//! caller of that intent.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::events::{EventDetails, EventLog, EventType};
use crate::monitor::DeadlineMonitor;
use crate::score::{day_key, Mood, ScoreEngine, ScoreState, COMPLETION_HEALTH, FAILURE_HEALTH};
use crate::storage::{keys, Config, Store};
use crate::task::{Task, TaskRegistry, TimeRemaining};

/// Result of a create intent.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOutcome {
    pub task: Task,
    /// True when a supplied deadline did not parse and was dropped; the
    /// task was still created, the caller should warn the user.
    pub deadline_ignored: bool,
    pub total_tasks: usize,
}

/// Result of a completion, failure, or expiry intent.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task: Task,
    pub score: ScoreState,
    pub mood: Mood,
    /// Status line for the companion display.
    pub status: String,
    /// Transient health-change message ("+20 Health!").
    pub health_flash: String,
}

/// One task as handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub index: usize,
    pub id: Uuid,
    pub text: String,
    pub time_remaining: Option<TimeRemaining>,
    pub created_at: DateTime<Utc>,
}

/// Full render payload for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct RenderState {
    pub tasks: Vec<TaskView>,
    pub mood: Mood,
    pub status: String,
    pub points: i64,
    pub health: i64,
    pub streak: u32,
}

/// Coordinates registry, score engine, event log, and store.
///
/// Holds no domain state of its own; constructed explicitly via
/// [`LifecycleController::open`] rather than loading implicitly at
/// startup.
pub struct LifecycleController {
    registry: TaskRegistry,
    score: ScoreEngine,
    log: EventLog,
    monitor: DeadlineMonitor,
    store: Store,
}

impl LifecycleController {
    /// Open the default store and load persisted state.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let store = Store::open()?;
        Self::with_store(store, &config)
    }

    /// Build a controller over an explicit store (used by tests and by
    /// callers that manage their own storage location).
    ///
    /// Missing or corrupt persisted values load as first-run defaults.
    pub fn with_store(store: Store, config: &Config) -> Result<Self> {
        let registry = TaskRegistry::from_tasks(store.load_tasks()?);
        let score = ScoreEngine::new(store.load_score(&config.scoring)?);
        let log = EventLog::from_entries(store.load_logs()?);
        let monitor = DeadlineMonitor::with_interval_secs(config.monitor.sweep_interval_secs);
        Ok(Self {
            registry,
            score,
            log,
            monitor,
            store,
        })
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Create a task.
    ///
    /// An unparseable deadline degrades to "no deadline" and is reported
    /// through [`CreateOutcome::deadline_ignored`]; empty text aborts the
    /// intent with no state mutated.
    pub fn create_task(&mut self, text: &str, deadline_input: Option<&str>) -> Result<CreateOutcome> {
        let (deadline, deadline_ignored) =
            match deadline_input.map(str::trim).filter(|raw| !raw.is_empty()) {
                None => (None, false),
                Some(raw) => match parse_deadline(raw) {
                    Some(at) => (Some(at), false),
                    None => (None, true),
                },
            };

        let task = self.registry.create(text, deadline)?;
        let group = self.store.experiment_group()?;
        self.log.append(
            EventType::TaskCreated,
            &group,
            EventDetails::created(&task.text, self.registry.len()),
        );
        self.persist()?;

        Ok(CreateOutcome {
            total_tasks: self.registry.len(),
            task,
            deadline_ignored,
        })
    }

    /// Complete the task at a display position.
    pub fn complete_at(&mut self, index: usize) -> Result<TaskOutcome> {
        let id = self.id_at(index)?;
        self.complete_by_id(id)
    }

    /// Complete a task by identity.
    pub fn complete_by_id(&mut self, id: Uuid) -> Result<TaskOutcome> {
        let task = self
            .registry
            .remove_by_id(id)
            .ok_or(ValidationError::UnknownTask { id })?;

        let today = day_key(Local::now().date_naive());
        self.score.apply_completion(&today);
        let group = self.store.experiment_group()?;
        self.log.append(
            EventType::TaskCompleted,
            &group,
            EventDetails::outcome(&task.text, self.score.state(), self.registry.len()),
        );
        self.persist()?;

        Ok(self.outcome(task, true))
    }

    /// Fail the task at a display position.
    pub fn fail_at(&mut self, index: usize) -> Result<TaskOutcome> {
        let id = self.id_at(index)?;
        self.fail_by_id(id)
    }

    /// Fail a task by identity (explicit intent or deadline expiry).
    pub fn fail_by_id(&mut self, id: Uuid) -> Result<TaskOutcome> {
        let task = self
            .registry
            .remove_by_id(id)
            .ok_or(ValidationError::UnknownTask { id })?;

        self.score.apply_failure();
        let group = self.store.experiment_group()?;
        self.log.append(
            EventType::TaskFailed,
            &group,
            EventDetails::outcome(&task.text, self.score.state(), self.registry.len()),
        );
        self.persist()?;

        Ok(self.outcome(task, false))
    }

    /// Sweep for expired deadlines and force a failure outcome for each.
    ///
    /// Every expired task yields a `task_deadline_reached` entry (stamped
    /// before anything mutates) followed by the regular failure path and
    /// its `task_failed` entry.
    pub fn poll_deadlines(&mut self) -> Result<Vec<TaskOutcome>> {
        self.poll_deadlines_at(Utc::now())
    }

    /// [`Self::poll_deadlines`] against an explicit clock.
    pub fn poll_deadlines_at(&mut self, now: DateTime<Utc>) -> Result<Vec<TaskOutcome>> {
        let expired = self.monitor.sweep(&self.registry, now);
        let mut outcomes = Vec::with_capacity(expired.len());

        for id in expired {
            // Resolve by identity: the task may have been completed or
            // failed since the snapshot was taken.
            let Some(text) = self.registry.get_by_id(id).map(|task| task.text.clone()) else {
                continue;
            };
            let group = self.store.experiment_group()?;
            self.log.append(
                EventType::TaskDeadlineReached,
                &group,
                EventDetails::outcome(&text, self.score.state(), self.registry.len()),
            );
            outcomes.push(self.fail_by_id(id)?);
        }

        Ok(outcomes)
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Assemble the full payload the presentation layer renders from.
    pub fn render_state(&self, message: &str) -> RenderState {
        self.render_state_at(message, Utc::now())
    }

    /// [`Self::render_state`] against an explicit clock.
    pub fn render_state_at(&self, message: &str, now: DateTime<Utc>) -> RenderState {
        let state = self.score.state();
        RenderState {
            tasks: self
                .registry
                .list()
                .iter()
                .enumerate()
                .map(|(index, task)| TaskView {
                    index,
                    id: task.id,
                    text: task.text.clone(),
                    time_remaining: task.time_remaining(now),
                    created_at: task.created_at,
                })
                .collect(),
            mood: self.score.mood(),
            status: format!(
                "{message} | Points: {} | Health: {}",
                state.points, state.health
            ),
            points: state.points,
            health: state.health,
            streak: state.streak,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.registry.list()
    }

    pub fn score(&self) -> &ScoreState {
        self.score.state()
    }

    pub fn mood(&self) -> Mood {
        self.score.mood()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn monitor(&self) -> &DeadlineMonitor {
        &self.monitor
    }

    pub fn experiment_group(&self) -> Result<String> {
        Ok(self.store.experiment_group()?)
    }

    /// Serialize the full log for the export collaborator.
    pub fn export_logs(&self) -> Result<String> {
        Ok(self.log.export_json()?)
    }

    /// Clear the event log, in memory and in storage. Irreversible.
    pub fn reset_logs(&mut self) -> Result<()> {
        self.log.reset();
        self.store.kv_set(keys::LOGS, "[]")?;
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn id_at(&self, index: usize) -> Result<Uuid, ValidationError> {
        self.registry
            .list()
            .get(index)
            .map(|task| task.id)
            .ok_or(ValidationError::OutOfBounds {
                index,
                len: self.registry.len(),
            })
    }

    fn persist(&mut self) -> Result<()> {
        self.store
            .commit_state(self.registry.list(), self.score.state(), self.log.entries())
    }

    fn outcome(&self, task: Task, completed: bool) -> TaskOutcome {
        let (status, health_flash) = if completed {
            (
                format!("Completed: {}", task.text),
                format!("+{COMPLETION_HEALTH} Health!"),
            )
        } else {
            (
                format!("Task failed: {}", task.text),
                format!("-{FAILURE_HEALTH} Health!"),
            )
        };
        TaskOutcome {
            score: self.score.state().clone(),
            mood: self.score.mood(),
            status,
            health_flash,
            task,
        }
    }
}

/// Parse a user-supplied deadline.
///
/// Accepts RFC 3339 and the local `YYYY-MM-DDTHH:MM[:SS]` shape of a
/// datetime-local input. `None` means the input did not parse.
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|at| at.with_timezone(&Utc));
        }
    }
    None
}
