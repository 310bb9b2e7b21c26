//! # Taskpet Core Library
//!
//! Core business logic for Taskpet, a gamified task tracker with a
//! virtual-pet companion: completing tasks raises points and health,
//! failing tasks (explicitly or by missed deadline) lowers them, and
//! every action lands in an exportable event log tagged with the user's
//! experiment group.
//!
//! The library follows a CLI-first philosophy: all operations are
//! available through this crate, with the CLI binary being a thin
//! presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **LifecycleController**: coordinates every intent through the same
//!   apply -> log -> commit sequence
//! - **DeadlineMonitor**: tick-driven expiry sweep; the caller invokes it
//!   periodically, there are no internal threads
//! - **Storage**: SQLite-backed key-value state and TOML configuration
//!
//! ## Key Components
//!
//! - [`LifecycleController`]: intent state machine
//! - [`TaskRegistry`]: ordered pending tasks with stable identities
//! - [`ScoreEngine`]: points, health, and streak tracking
//! - [`EventLog`]: append-only experiment instrumentation
//! - [`Store`]: durable key-value state

pub mod controller;
pub mod error;
pub mod events;
pub mod monitor;
pub mod score;
pub mod storage;
pub mod task;

pub use controller::{CreateOutcome, LifecycleController, RenderState, TaskOutcome, TaskView};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use events::{EventDetails, EventLog, EventType, LogEntry, DEFAULT_GROUP};
pub use monitor::DeadlineMonitor;
pub use score::{day_key, Mood, ScoreEngine, ScoreState};
pub use storage::{data_dir, Config, Store};
pub use task::{Task, TaskRegistry, TimeRemaining};
