use serde::{Deserialize, Serialize};

use crate::error::RoutineError;

/// One exercise in a routine.
///
/// Either time-based (a countdown of `duration_secs` per set) or rep-based
/// (the user signals when a set is done). Rest applies after every set,
/// including the last one, whenever `rest_secs > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    /// Display label, may be empty.
    #[serde(default)]
    pub name: String,
    pub time_based: bool,
    /// Number of sets, at least 1.
    pub sets: u32,
    /// Countdown length per set in seconds. Only meaningful when `time_based`.
    #[serde(default)]
    pub duration_secs: u64,
    /// Rest after each set in seconds. Zero means no rest phase.
    #[serde(default)]
    pub rest_secs: u64,
}

impl ExerciseSpec {
    pub fn timed(name: &str, sets: u32, duration_secs: u64, rest_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            time_based: true,
            sets,
            duration_secs,
            rest_secs,
        }
    }

    pub fn reps(name: &str, sets: u32, rest_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            time_based: false,
            sets,
            duration_secs: 0,
            rest_secs,
        }
    }

    /// Countdown length in milliseconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_ms(&self) -> u64 {
        self.duration_secs.saturating_mul(1000)
    }

    /// Rest length in milliseconds.
    pub fn rest_ms(&self) -> u64 {
        self.rest_secs.saturating_mul(1000)
    }
}

/// An ordered list of exercises.
///
/// Serializes transparently as a JSON array of exercise records, so a
/// routine round-trips losslessly through import/export. Built and edited
/// before a session starts; a running session holds its own immutable copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Routine {
    pub exercises: Vec<ExerciseSpec>,
}

impl Routine {
    pub fn new(exercises: Vec<ExerciseSpec>) -> Self {
        Self { exercises }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExerciseSpec> {
        self.exercises.get(index)
    }

    /// Check the invariants a session relies on: non-empty, `sets >= 1`.
    pub fn validate(&self) -> Result<(), RoutineError> {
        if self.exercises.is_empty() {
            return Err(RoutineError::Empty);
        }
        if let Some(index) = self.exercises.iter().position(|e| e.sets == 0) {
            return Err(RoutineError::ZeroSets { index });
        }
        Ok(())
    }

    pub fn total_sets(&self) -> u64 {
        self.exercises.iter().map(|e| u64::from(e.sets)).sum()
    }

    /// Sets in all exercises before `index`.
    pub fn cumulative_sets(&self, index: usize) -> u64 {
        self.exercises
            .iter()
            .take(index)
            .map(|e| u64::from(e.sets))
            .sum()
    }

    /// Rough wall-clock length in seconds: every set owes its countdown
    /// (timed exercises only) plus its rest.
    pub fn estimated_duration_secs(&self) -> u64 {
        self.exercises
            .iter()
            .map(|e| {
                let work = if e.time_based { e.duration_secs } else { 0 };
                u64::from(e.sets).saturating_mul(work.saturating_add(e.rest_secs))
            })
            .sum()
    }

    /// The built-in bodyweight circuit seeded on first use.
    pub fn starter() -> Self {
        Self {
            exercises: vec![
                ExerciseSpec::timed("Plank", 3, 30, 15),
                ExerciseSpec::reps("Push-ups", 3, 60),
                ExerciseSpec::reps("Squats", 3, 60),
                ExerciseSpec::timed("Wall Sit", 2, 45, 30),
                ExerciseSpec::reps("Lunges", 3, 45),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_routine_is_invalid() {
        assert_eq!(Routine::default().validate(), Err(RoutineError::Empty));
    }

    #[test]
    fn zero_sets_is_invalid() {
        let routine = Routine::new(vec![
            ExerciseSpec::timed("Plank", 2, 30, 10),
            ExerciseSpec::reps("Push-ups", 0, 10),
        ]);
        assert_eq!(
            routine.validate(),
            Err(RoutineError::ZeroSets { index: 1 })
        );
    }

    #[test]
    fn starter_routine_is_valid() {
        let routine = Routine::starter();
        assert!(routine.validate().is_ok());
        assert_eq!(routine.len(), 5);
    }

    #[test]
    fn set_counting() {
        let routine = Routine::new(vec![
            ExerciseSpec::timed("Plank", 3, 30, 15),
            ExerciseSpec::reps("Push-ups", 2, 60),
        ]);
        assert_eq!(routine.total_sets(), 5);
        assert_eq!(routine.cumulative_sets(0), 0);
        assert_eq!(routine.cumulative_sets(1), 3);
    }

    #[test]
    fn estimated_duration_counts_rest_for_every_set() {
        let routine = Routine::new(vec![
            ExerciseSpec::timed("Plank", 2, 30, 10),
            ExerciseSpec::reps("Push-ups", 3, 20),
        ]);
        // 2 * (30 + 10) + 3 * 20
        assert_eq!(routine.estimated_duration_secs(), 140);
    }

    #[test]
    fn serializes_as_bare_array() {
        let routine = Routine::new(vec![ExerciseSpec::reps("Push-ups", 3, 60)]);
        let json = serde_json::to_value(&routine).unwrap();
        assert!(json.is_array());
        let back: Routine = serde_json::from_value(json).unwrap();
        assert_eq!(back, routine);
    }

    #[test]
    fn duration_helpers_saturate() {
        let spec = ExerciseSpec::timed("Plank", 1, u64::MAX, u64::MAX);
        assert_eq!(spec.duration_ms(), u64::MAX);
        assert_eq!(spec.rest_ms(), u64::MAX);
    }
}
