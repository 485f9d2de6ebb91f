use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::{Distance, ExerciseTemplateID, RPE, Reps, SessionResult, SetType, Time, Weight};

/// Payload for creating a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_private: bool,
    pub exercises: Vec<NewWorkoutExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutExercise {
    pub exercise_template_id: ExerciseTemplateID,
    pub superset_id: Option<u32>,
    pub notes: Option<String>,
    pub sets: Vec<NewWorkoutSet>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NewWorkoutSet {
    pub set_type: SetType,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub distance: Option<Distance>,
    pub duration: Option<Time>,
    pub rpe: Option<RPE>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no completed exercises to save")]
pub struct NothingToSave;

impl TryFrom<&SessionResult> for NewWorkout {
    type Error = NothingToSave;

    /// Keep only completed sets, and only exercises with at least one of them.
    fn try_from(result: &SessionResult) -> Result<Self, Self::Error> {
        let exercises = result
            .exercises
            .iter()
            .filter_map(|exercise| {
                let sets = exercise
                    .sets
                    .iter()
                    .filter(|s| s.complete)
                    .map(|s| NewWorkoutSet {
                        set_type: s.set_type,
                        weight: Some(s.weight),
                        reps: Some(s.reps),
                        ..NewWorkoutSet::default()
                    })
                    .collect::<Vec<_>>();

                if sets.is_empty() {
                    return None;
                }

                Some(NewWorkoutExercise {
                    exercise_template_id: exercise.template.id.clone(),
                    superset_id: None,
                    notes: Some(exercise.notes.trim())
                        .filter(|n| !n.is_empty())
                        .map(str::to_string),
                    sets,
                })
            })
            .collect::<Vec<_>>();

        if exercises.is_empty() {
            return Err(NothingToSave);
        }

        Ok(Self {
            title: result.title.clone(),
            description: None,
            start_time: result.start_time,
            end_time: result.end_time,
            is_private: false,
            exercises,
        })
    }
}

impl NewWorkout {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}
