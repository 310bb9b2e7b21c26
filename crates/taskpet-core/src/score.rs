//! Points, health, and streak tracking for task outcomes.
//!
//! The score engine owns [`ScoreState`] exclusively and applies fixed
//! deltas when the controller reports a completion or failure. Health is
//! clamped to `[0, 100]`, points never go below zero, and the streak
//! advances at most once per calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded per completed task.
pub const COMPLETION_POINTS: i64 = 10;
/// Points deducted per failed task (floored at zero).
pub const FAILURE_POINTS: i64 = 10;
/// Health gained per completed task (capped at [`MAX_HEALTH`]).
pub const COMPLETION_HEALTH: i64 = 20;
/// Health lost per failed task (floored at zero).
pub const FAILURE_HEALTH: i64 = 25;
/// Upper health bound.
pub const MAX_HEALTH: i64 = 100;

const HAPPY_THRESHOLD: i64 = 75;
const SAD_THRESHOLD: i64 = 40;

/// Companion vitality and progress counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Accumulated points, never negative.
    pub points: i64,
    /// Companion vitality in `[0, 100]`.
    pub health: i64,
    /// Consecutive distinct-calendar-day completion count.
    pub streak: u32,
    /// Day key of the most recent streak-advancing completion.
    pub last_completion_date: Option<String>,
}

impl ScoreState {
    /// First-run state: no streak, configured starting points and health.
    pub fn initial(points: i64, health: i64) -> Self {
        Self {
            points,
            health: health.clamp(0, MAX_HEALTH),
            streak: 0,
            last_completion_date: None,
        }
    }
}

/// Companion mood, a pure function of health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    /// Happy at `health >= 75`, sad below 40, neutral otherwise.
    pub fn from_health(health: i64) -> Self {
        if health >= HAPPY_THRESHOLD {
            Mood::Happy
        } else if health < SAD_THRESHOLD {
            Mood::Sad
        } else {
            Mood::Neutral
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        };
        f.write_str(label)
    }
}

/// Calendar-day identity used for streak comparison.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Applies outcome deltas to the owned [`ScoreState`].
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    state: ScoreState,
}

impl ScoreEngine {
    pub fn new(state: ScoreState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn mood(&self) -> Mood {
        Mood::from_health(self.state.health)
    }

    /// Apply a completion on the given calendar day.
    ///
    /// The streak only advances when the day differs from the last
    /// streak-advancing completion, or when the streak is currently zero.
    pub fn apply_completion(&mut self, day: &str) -> &ScoreState {
        self.state.points += COMPLETION_POINTS;
        self.state.health = (self.state.health + COMPLETION_HEALTH).min(MAX_HEALTH);

        if self.state.streak == 0 || self.state.last_completion_date.as_deref() != Some(day) {
            self.state.streak += 1;
            self.state.last_completion_date = Some(day.to_string());
        }

        &self.state
    }

    /// Apply a failure: deduct points and health, reset the streak.
    pub fn apply_failure(&mut self) -> &ScoreState {
        self.state.points = (self.state.points - FAILURE_POINTS).max(0);
        self.state.health = (self.state.health - FAILURE_HEALTH).max(0);
        self.state.streak = 0;
        self.state.last_completion_date = None;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine(points: i64, health: i64) -> ScoreEngine {
        ScoreEngine::new(ScoreState::initial(points, health))
    }

    #[test]
    fn completion_applies_deltas() {
        let mut engine = engine(50, 70);
        let state = engine.apply_completion("2026-08-06");
        assert_eq!(state.points, 60);
        assert_eq!(state.health, 90);
    }

    #[test]
    fn completion_clamps_health_at_max() {
        let mut engine = engine(50, 90);
        assert_eq!(engine.apply_completion("2026-08-06").health, 100);
    }

    #[test]
    fn failure_floors_points_and_health() {
        let mut engine = engine(5, 10);
        let state = engine.apply_failure();
        assert_eq!(state.points, 0);
        assert_eq!(state.health, 0);
    }

    #[test]
    fn same_day_completions_advance_streak_once() {
        let mut engine = engine(50, 100);
        engine.apply_completion("2026-08-06");
        engine.apply_completion("2026-08-06");
        assert_eq!(engine.state().streak, 1);
    }

    #[test]
    fn next_day_completion_advances_streak() {
        let mut engine = engine(50, 100);
        engine.apply_completion("2026-08-06");
        engine.apply_completion("2026-08-07");
        assert_eq!(engine.state().streak, 2);
        assert_eq!(
            engine.state().last_completion_date.as_deref(),
            Some("2026-08-07")
        );
    }

    #[test]
    fn failure_resets_streak() {
        let mut engine = engine(50, 100);
        engine.apply_completion("2026-08-06");
        engine.apply_completion("2026-08-07");
        engine.apply_failure();
        assert_eq!(engine.state().streak, 0);
        assert!(engine.state().last_completion_date.is_none());

        // A zero streak restarts even on a repeated day.
        engine.apply_completion("2026-08-07");
        assert_eq!(engine.state().streak, 1);
    }

    #[test]
    fn mood_thresholds() {
        assert_eq!(Mood::from_health(80), Mood::Happy);
        assert_eq!(Mood::from_health(75), Mood::Happy);
        assert_eq!(Mood::from_health(50), Mood::Neutral);
        assert_eq!(Mood::from_health(40), Mood::Neutral);
        assert_eq!(Mood::from_health(30), Mood::Sad);
    }

    #[test]
    fn day_key_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(day_key(date), "2026-08-06");
    }

    proptest! {
        #[test]
        fn bounds_hold_under_any_outcome_sequence(outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut engine = engine(50, 100);
            for (i, completed) in outcomes.iter().enumerate() {
                if *completed {
                    engine.apply_completion(&format!("day-{i}"));
                } else {
                    engine.apply_failure();
                }
                let state = engine.state();
                prop_assert!(state.points >= 0);
                prop_assert!((0..=MAX_HEALTH).contains(&state.health));
            }
        }
    }
}
