use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Phase, RunMode};

/// Every state change in a session produces an Event.
/// The driver polls for them; the UI renders them.
///
/// Timestamps come from the `now` passed into the operation, never from an
/// ambient clock, so event streams are reproducible in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        exercise_count: usize,
        at: DateTime<Utc>,
    },
    /// A new countdown or rep-wait phase was armed.
    PhaseStarted {
        exercise_index: usize,
        current_set: u32,
        phase: Phase,
        /// Armed countdown length; 0 for a rep-wait phase.
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    ExerciseSkipped {
        from_exercise: usize,
        to_exercise: usize,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        at: DateTime<Utc>,
    },
    SessionCancelled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        exercise_index: usize,
        exercise_count: usize,
        exercise_name: String,
        current_set: u32,
        set_count: u32,
        phase: Phase,
        run_mode: RunMode,
        remaining_ms: u64,
        /// Duration armed for the current phase; 0 for a rep-wait phase.
        total_ms: u64,
        /// Sets completed over total sets, 0.0 .. 100.0.
        progress_pct: f64,
        completed: bool,
        at: DateTime<Utc>,
    },
}
