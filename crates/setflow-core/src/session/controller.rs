//! Workout session controller.
//!
//! The controller is a wall-clock-based state machine. It does not use
//! internal threads or read ambient time - the caller passes `now` into
//! every operation and is responsible for calling `tick()` periodically.
//!
//! ## Phase transitions
//!
//! ```text
//! Exercising -> Resting -> (next set | next exercise | Completed)
//! ```
//!
//! Rest is owed after every set, including the last set of the last
//! exercise, whenever the exercise has a non-zero rest duration.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SessionController::start(routine, alerts, clock.now())?;
//! // In a loop:
//! session.tick(clock.now()); // Returns Some(Event) when a phase ends
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::alert::AlertPort;
use crate::error::RoutineError;
use crate::events::Event;
use crate::routine::{ExerciseSpec, Routine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Exercising,
    Resting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Running,
    Paused,
    Completed,
    Exiting,
}

/// Drives one workout through its phases.
///
/// Remaining time is always recomputed as `phase_end_at - now` from an
/// absolute deadline. The deadline is set when a phase is armed or resumed
/// and never adjusted piecewise, so a suspended host recovers the correct
/// countdown on its next `tick()`.
pub struct SessionController {
    routine: Routine,
    exercise_index: usize,
    /// 1-based set number within the current exercise.
    current_set: u32,
    phase: Phase,
    run_mode: RunMode,
    /// Absolute deadline of the current countdown.
    /// `None` while waiting for a rep confirmation, and while paused.
    phase_end_at: Option<DateTime<Utc>>,
    /// Cached display value; the frozen countdown while paused.
    remaining_ms: u64,
    /// Last timestamp any operation observed, for stale-tick clamping.
    last_seen_at: Option<DateTime<Utc>>,
    alerts: Box<dyn AlertPort>,
}

impl SessionController {
    /// Start a session at exercise 0, set 1.
    ///
    /// # Errors
    ///
    /// Rejects an empty routine or one with a zero-set exercise; no session
    /// state exists on error.
    pub fn start(
        routine: Routine,
        alerts: Box<dyn AlertPort>,
        now: DateTime<Utc>,
    ) -> Result<Self, RoutineError> {
        routine.validate()?;
        let mut session = Self {
            routine,
            exercise_index: 0,
            current_set: 1,
            phase: Phase::Exercising,
            run_mode: RunMode::Running,
            phase_end_at: None,
            remaining_ms: 0,
            last_seen_at: Some(now),
            alerts,
        };
        session.arm_exercise_phase(now);
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn current_exercise(&self) -> &ExerciseSpec {
        &self.routine.exercises[self.exercise_index]
    }

    /// Whether the current phase runs on a countdown (as opposed to a
    /// rep-wait, which only ends on explicit confirmation).
    pub fn has_countdown(&self) -> bool {
        self.phase == Phase::Resting || self.current_exercise().time_based
    }

    /// Duration armed for the current phase; 0 for a rep-wait.
    pub fn phase_total_ms(&self) -> u64 {
        match self.phase {
            Phase::Resting => self.current_exercise().rest_ms(),
            Phase::Exercising => {
                let spec = self.current_exercise();
                if spec.time_based {
                    spec.duration_ms()
                } else {
                    0
                }
            }
        }
    }

    /// 0.0 .. 100.0 progress across the whole routine, in completed sets.
    pub fn progress_pct(&self) -> f64 {
        let total = self.routine.total_sets();
        if total == 0 {
            return 0.0;
        }
        if self.run_mode == RunMode::Completed {
            return 100.0;
        }
        let mut done =
            self.routine.cumulative_sets(self.exercise_index) + u64::from(self.current_set - 1);
        if self.phase == Phase::Resting {
            done += 1;
        }
        (done as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let spec = self.current_exercise();
        Event::StateSnapshot {
            exercise_index: self.exercise_index,
            exercise_count: self.routine.len(),
            exercise_name: spec.name.clone(),
            current_set: self.current_set,
            set_count: spec.sets,
            phase: self.phase,
            run_mode: self.run_mode,
            remaining_ms: self.remaining_ms,
            total_ms: self.phase_total_ms(),
            progress_pct: self.progress_pct(),
            completed: self.run_mode == RunMode::Completed,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Recomputes the countdown and, when it reaches
    /// zero, performs the phase transition exactly once.
    ///
    /// A `now` earlier than the last observed timestamp is clamped: the
    /// previous remaining value stands and no transition fires. Calling
    /// again after a transition already handled expiry must not
    /// double-advance; the new phase simply keeps counting down.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode != RunMode::Running {
            return None;
        }
        if let Some(seen) = self.last_seen_at {
            if now < seen {
                return None;
            }
        }
        self.last_seen_at = Some(now);
        let end = self.phase_end_at?;
        self.remaining_ms = remaining_between(now, end);
        if self.remaining_ms == 0 {
            return Some(self.advance_phase(now));
        }
        None
    }

    /// Manual substitute for a countdown reaching zero, for rep-based
    /// exercises. A no-op while resting, paused, or on a timed exercise.
    pub fn confirm_reps_done(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode != RunMode::Running
            || self.phase != Phase::Exercising
            || self.current_exercise().time_based
        {
            return None;
        }
        self.last_seen_at = Some(now);
        Some(self.advance_phase(now))
    }

    /// Freeze the countdown. The pending alert is cancelled and must be
    /// rescheduled on resume.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode != RunMode::Running {
            return None;
        }
        if let Some(end) = self.phase_end_at.take() {
            self.remaining_ms = remaining_between(now, end);
        }
        self.run_mode = RunMode::Paused;
        self.last_seen_at = Some(now);
        self.alerts.cancel();
        Some(Event::SessionPaused {
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    /// Re-arm the frozen countdown from `now`. However long the pause
    /// lasted, the countdown resumes with exactly the frozen remainder.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode != RunMode::Paused {
            return None;
        }
        self.run_mode = RunMode::Running;
        self.last_seen_at = Some(now);
        if self.has_countdown() {
            self.phase_end_at = Some(deadline(now, self.remaining_ms));
            self.alerts.schedule(self.phase, self.remaining_ms);
        }
        Some(Event::SessionResumed {
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    /// Abandon the rest of the current exercise and move to the next one,
    /// completing the session on the last.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode != RunMode::Running {
            return None;
        }
        self.last_seen_at = Some(now);
        self.alerts.cancel();
        let from = self.exercise_index;
        match self.advance_exercise(now) {
            done @ Event::SessionCompleted { .. } => Some(done),
            _ => Some(Event::ExerciseSkipped {
                from_exercise: from,
                to_exercise: self.exercise_index,
                at: now,
            }),
        }
    }

    /// Leave the session. Effective from any run mode, including
    /// mid-transition; everything afterwards is a no-op.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run_mode == RunMode::Exiting {
            return None;
        }
        self.run_mode = RunMode::Exiting;
        self.phase_end_at = None;
        self.alerts.cancel();
        Some(Event::SessionCancelled { at: now })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The phase-expiry transition, shared by timer expiry and manual rep
    /// confirmation. Exactly one transition per call.
    fn advance_phase(&mut self, now: DateTime<Utc>) -> Event {
        match self.phase {
            // A finished rest belongs to the exercise just worked.
            Phase::Resting => {
                self.current_set += 1;
                if self.current_set <= self.current_exercise().sets {
                    self.arm_exercise_phase(now);
                    self.phase_started(now)
                } else {
                    self.advance_exercise(now)
                }
            }
            Phase::Exercising => {
                let rest_ms = self.current_exercise().rest_ms();
                let sets = self.current_exercise().sets;
                if rest_ms > 0 {
                    // Rest after every set, the last one included.
                    self.phase = Phase::Resting;
                    self.arm_countdown(rest_ms, now);
                    self.phase_started(now)
                } else if self.current_set >= sets {
                    self.advance_exercise(now)
                } else {
                    self.current_set += 1;
                    self.arm_exercise_phase(now);
                    self.phase_started(now)
                }
            }
        }
    }

    /// "All sets done" branch: next exercise at set 1, or completion.
    fn advance_exercise(&mut self, now: DateTime<Utc>) -> Event {
        self.current_set = 1;
        if self.exercise_index + 1 < self.routine.len() {
            self.exercise_index += 1;
            self.arm_exercise_phase(now);
            self.phase_started(now)
        } else {
            self.run_mode = RunMode::Completed;
            self.phase = Phase::Exercising;
            self.phase_end_at = None;
            self.remaining_ms = 0;
            self.alerts.cancel();
            Event::SessionCompleted { at: now }
        }
    }

    fn arm_exercise_phase(&mut self, now: DateTime<Utc>) {
        self.phase = Phase::Exercising;
        let spec = self.current_exercise();
        if spec.time_based {
            let duration = spec.duration_ms();
            self.arm_countdown(duration, now);
        } else {
            // Rep-wait: no deadline until the user confirms.
            self.phase_end_at = None;
            self.remaining_ms = 0;
        }
    }

    fn arm_countdown(&mut self, duration_ms: u64, now: DateTime<Utc>) {
        self.phase_end_at = Some(deadline(now, duration_ms));
        self.remaining_ms = duration_ms;
        self.alerts.schedule(self.phase, duration_ms);
    }

    fn phase_started(&self, now: DateTime<Utc>) -> Event {
        Event::PhaseStarted {
            exercise_index: self.exercise_index,
            current_set: self.current_set,
            phase: self.phase,
            duration_ms: self.remaining_ms,
            at: now,
        }
    }
}

fn deadline(now: DateTime<Utc>, duration_ms: u64) -> DateTime<Utc> {
    let delta = Duration::milliseconds(duration_ms.min(i64::MAX as u64) as i64);
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn remaining_between(now: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - now).num_milliseconds().max(0) as u64
}
