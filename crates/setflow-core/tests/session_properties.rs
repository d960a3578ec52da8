//! Property tests for the session state machine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use setflow_core::{ExerciseSpec, NullAlerts, Routine, RunMode, SessionController};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::seconds(secs)
}

fn exercise_strategy() -> impl Strategy<Value = ExerciseSpec> {
    (
        prop_oneof![Just("Plank"), Just("Push-ups"), Just("Squats")],
        any::<bool>(),
        1u32..=3,
        0u64..=5,
        0u64..=3,
    )
        .prop_map(|(name, time_based, sets, duration_secs, rest_secs)| ExerciseSpec {
            name: name.to_string(),
            time_based,
            sets,
            duration_secs,
            rest_secs,
        })
}

fn routine_strategy() -> impl Strategy<Value = Routine> {
    prop::collection::vec(exercise_strategy(), 1..4).prop_map(Routine::new)
}

proptest! {
    /// Strictly increasing ticks (with rep-waits confirmed) always reach
    /// completion, and the countdown stays within the armed duration.
    #[test]
    fn any_valid_routine_eventually_completes(routine in routine_strategy()) {
        let mut session =
            SessionController::start(routine, Box::new(NullAlerts), at(0)).unwrap();
        let mut now = 0i64;
        let mut steps = 0u32;
        while session.run_mode() == RunMode::Running {
            steps += 1;
            prop_assert!(steps < 10_000, "session did not complete");
            prop_assert!(session.remaining_ms() <= session.phase_total_ms());
            if session.has_countdown() {
                now += 1;
                session.tick(at(now));
            } else {
                session.confirm_reps_done(at(now));
            }
        }
        prop_assert_eq!(session.run_mode(), RunMode::Completed);
    }

    /// Pausing with R remaining and resuming after any gap yields a fresh
    /// countdown of exactly R.
    #[test]
    fn pause_gap_resume_preserves_countdown(
        duration in 1u64..120,
        elapsed in 0i64..120,
        gap in 0i64..10_000,
    ) {
        prop_assume!((elapsed as u64) < duration);
        let routine = Routine::new(vec![ExerciseSpec::timed("Plank", 1, duration, 0)]);
        let mut session =
            SessionController::start(routine, Box::new(NullAlerts), at(0)).unwrap();

        session.tick(at(elapsed));
        let frozen = session.remaining_ms();
        prop_assert_eq!(frozen, (duration - elapsed as u64) * 1000);

        session.pause(at(elapsed));
        session.resume(at(elapsed + gap));
        session.tick(at(elapsed + gap));
        prop_assert_eq!(session.remaining_ms(), frozen);
    }
}
