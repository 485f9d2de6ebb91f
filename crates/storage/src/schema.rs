//! Wire representation of the entities exchanged with the API.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, FixedOffset, SecondsFormat};
use ironlog_domain as domain;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error("invalid {entity} ID: {id}")]
    InvalidID { entity: &'static str, id: String },
}

impl From<ConversionError> for domain::ReadError {
    fn from(value: ConversionError) -> Self {
        domain::ReadError::Other(Box::new(value))
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkoutsPage {
    pub page: u32,
    pub page_count: u32,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Deserialize)]
pub struct RoutinesPage {
    pub page: u32,
    pub page_count: u32,
    #[serde(default)]
    pub routines: Vec<Routine>,
}

#[derive(Debug, Deserialize)]
pub struct RoutineFoldersPage {
    pub page: u32,
    pub page_count: u32,
    #[serde(default)]
    pub routine_folders: Vec<RoutineFolder>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseTemplatesPage {
    pub page: u32,
    pub page_count: u32,
    #[serde(default)]
    pub exercise_templates: Vec<ExerciseTemplate>,
}

#[derive(Debug, Deserialize)]
pub struct WorkoutResponse {
    pub workout: Workout,
}

#[derive(Debug, Deserialize)]
pub struct RoutineResponse {
    pub routine: Routine,
}

#[derive(Debug, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Deserialize)]
pub struct Routine {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub folder_id: Option<u64>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Deserialize)]
pub struct RoutineFolder {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Deserialize)]
pub struct Exercise {
    #[serde(default)]
    pub index: u32,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub exercise_template_id: String,
    #[serde(default)]
    pub superset_id: Option<u32>,
    #[serde(default)]
    pub sets: Vec<Set>,
}

#[derive(Debug, Deserialize)]
pub struct Set {
    #[serde(default)]
    pub index: u32,
    #[serde(rename = "type", default)]
    pub set_type: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub rpe: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub primary_muscle_group: Option<String>,
    #[serde(default)]
    pub secondary_muscle_groups: Option<Vec<String>>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Serialize)]
pub struct NewWorkoutRequest {
    pub workout: NewWorkout,
}

#[derive(Debug, Serialize)]
pub struct NewWorkout {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub is_private: bool,
    pub exercises: Vec<NewExercise>,
}

#[derive(Debug, Serialize)]
pub struct NewExercise {
    pub exercise_template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superset_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sets: Vec<NewSet>,
}

#[derive(Debug, Serialize)]
pub struct NewSet {
    #[serde(rename = "type")]
    pub set_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

pub fn page<T, U>(
    page: u32,
    page_count: u32,
    items: Vec<T>,
    convert: impl Fn(T) -> Result<U, ConversionError>,
) -> Result<domain::Page<U>, ConversionError> {
    Ok(domain::Page {
        page,
        page_count,
        items: items.into_iter().map(convert).collect::<Result<_, _>>()?,
    })
}

fn parse_id(entity: &'static str, id: &str) -> Result<Uuid, ConversionError> {
    Uuid::parse_str(id).map_err(|_| ConversionError::InvalidID {
        entity,
        id: id.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keep a recorded value only if it is valid.
fn recorded<T, E: Display>(field: &str, value: Result<T, E>) -> Option<T> {
    value
        .inspect_err(|err| warn!("ignoring invalid {field}: {err}"))
        .ok()
}

impl TryFrom<Workout> for domain::Workout {
    type Error = ConversionError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(domain::Workout {
            id: parse_id("workout", &value.id)?.into(),
            title: value.title,
            description: non_empty(value.description),
            start_time: value.start_time,
            end_time: value.end_time,
            exercises: value.exercises.into_iter().map(Into::into).collect(),
        })
    }
}

impl TryFrom<Routine> for domain::Routine {
    type Error = ConversionError;

    fn try_from(value: Routine) -> Result<Self, Self::Error> {
        Ok(domain::Routine {
            id: parse_id("routine", &value.id)?.into(),
            title: value.title,
            folder_id: value.folder_id.map(Into::into),
            exercises: value.exercises.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<RoutineFolder> for domain::RoutineFolder {
    fn from(value: RoutineFolder) -> Self {
        domain::RoutineFolder {
            id: value.id.into(),
            title: value.title,
            index: value.index,
        }
    }
}

impl From<ExerciseTemplate> for domain::ExerciseTemplate {
    fn from(value: ExerciseTemplate) -> Self {
        domain::ExerciseTemplate {
            id: value.id.into(),
            title: value.title,
            primary_muscle_group: value.primary_muscle_group.unwrap_or_default(),
            secondary_muscle_groups: value
                .secondary_muscle_groups
                .unwrap_or_default()
                .into_iter()
                .collect(),
            equipment: value.equipment.unwrap_or_default(),
            is_custom: value.is_custom,
        }
    }
}

impl From<Exercise> for domain::WorkoutExercise {
    fn from(value: Exercise) -> Self {
        domain::WorkoutExercise {
            index: value.index,
            title: value.title,
            notes: non_empty(value.notes),
            exercise_template_id: value.exercise_template_id.into(),
            superset_id: value.superset_id,
            sets: value.sets.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Set> for domain::Set {
    fn from(value: Set) -> Self {
        domain::Set {
            index: value.index,
            set_type: value
                .set_type
                .and_then(|t| recorded("set type", domain::SetType::from_str(&t)))
                .unwrap_or_default(),
            weight: value
                .weight_kg
                .and_then(|w| recorded("weight", domain::Weight::new(w))),
            reps: value.reps.and_then(|r| {
                recorded(
                    "reps",
                    u32::try_from(r)
                        .map_err(|_| domain::RepsError::OutOfRange)
                        .and_then(domain::Reps::new),
                )
            }),
            distance: value
                .distance_meters
                .and_then(|d| recorded("distance", domain::Distance::new(d))),
            duration: value.duration_seconds.and_then(|d| {
                recorded(
                    "duration",
                    u32::try_from(d)
                        .map_err(|_| domain::TimeError::OutOfRange)
                        .and_then(domain::Time::new),
                )
            }),
            rpe: value.rpe.and_then(|r| recorded("RPE", domain::RPE::new(r))),
        }
    }
}

fn timestamp(time: DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<domain::NewWorkout> for NewWorkoutRequest {
    fn from(value: domain::NewWorkout) -> Self {
        NewWorkoutRequest {
            workout: NewWorkout {
                title: value.title,
                description: value.description,
                start_time: timestamp(value.start_time),
                end_time: timestamp(value.end_time),
                is_private: value.is_private,
                exercises: value
                    .exercises
                    .into_iter()
                    .map(|exercise| NewExercise {
                        exercise_template_id: exercise.exercise_template_id.to_string(),
                        superset_id: exercise.superset_id,
                        notes: exercise.notes,
                        sets: exercise.sets.into_iter().map(NewSet::from).collect(),
                    })
                    .collect(),
            },
        }
    }
}

impl From<domain::NewWorkoutSet> for NewSet {
    fn from(value: domain::NewWorkoutSet) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let distance_meters = value.distance.map(|d| f64::from(d).round() as u64);
        NewSet {
            set_type: value.set_type.into(),
            weight_kg: value.weight.map(f64::from),
            reps: value.reps.map(u32::from),
            distance_meters,
            duration_seconds: value.duration.map(u32::from),
            rpe: value.rpe.map(f64::from),
        }
    }
}
