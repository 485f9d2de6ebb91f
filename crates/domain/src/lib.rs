#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod new_workout;
mod progress;
mod records;
mod routine;
mod service;
mod session;
mod statistics;
mod summary;
mod workout;

use std::fmt::{self, Display};

use derive_more::{Display, Into};
use thiserror::Error;

pub use error::{CreateError, ReadError, StorageError};
pub use exercise::{
    ExerciseTemplate, ExerciseTemplateFilter, ExerciseTemplateID, ExerciseTemplateRepository,
};
pub use new_workout::{NewWorkout, NewWorkoutExercise, NewWorkoutSet, NothingToSave};
pub use progress::{Progress, ProgressPoint, ProgressQuery, Trend, TrendAnalysis, progress};
pub use records::{PersonalRecord, RecordType, RecordsQuery, personal_records};
pub use routine::{Routine, RoutineFolder, RoutineFolderID, RoutineID, RoutineRepository};
pub use service::{
    ExerciseTemplateService, PAGE_SIZE, RoutineService, Service, WorkoutService,
};
pub use session::{
    Action, Field, Outcome, Session, SessionExercise, SessionResult, SessionSet, format_elapsed,
};
pub use statistics::{
    DateRange, Metric, Period, estimated_one_rep_max, max_reps, max_weight, round_to, volume,
};
pub use summary::{
    Consistency, ExerciseFrequency, ExerciseStats, Summary, VolumeStats, WorkoutStats,
    streaks, summary,
};
pub use workout::{Page, Set, SetType, Workout, WorkoutExercise, WorkoutID, WorkoutRepository};

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

impl From<Reps> for f64 {
    fn from(value: Reps) -> Self {
        f64::from(value.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() || !(0.0..10_000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f64>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 9999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub fn new(value: f64) -> Result<Self, DistanceError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DistanceError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DistanceError {
    #[error("Distance must be a non-negative number of meters")]
    OutOfRange,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl Time {
    pub fn new(value: u32) -> Result<Self, TimeError> {
        if !(0..86_400).contains(&value) {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be in the range 0 to 86399 s")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RPE(u8);

impl RPE {
    pub const SEVEN: RPE = RPE(70);
    pub const EIGHT: RPE = RPE(80);
    pub const TEN: RPE = RPE(100);

    pub fn new(value: f64) -> Result<Self, RPEError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (value * 10.0).round() as u8;

        if v % 5 != 0 {
            return Err(RPEError::InvalidResolution);
        }

        Ok(Self(v))
    }
}

impl From<RPE> for f64 {
    fn from(value: RPE) -> Self {
        f64::from(value.0) / 10.0
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f64>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f64::from(*self))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 0.0 to 10.0")]
    OutOfRange,
    #[error("RPE must be a multiple of 0.5")]
    InvalidResolution,
    #[error("RPE must be a decimal")]
    ParseError,
}
