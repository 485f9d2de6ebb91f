use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{
    CreateError, Distance, ExerciseTemplateID, NewWorkout, RPE, ReadError, Reps, Time, Weight,
};

pub trait WorkoutRepository {
    fn read_workouts(&self, page: u32, page_size: u32) -> Result<Page<Workout>, ReadError>;
    fn read_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub page: u32,
    pub page_count: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.page >= self.page_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Calendar day of the start time, in the offset the timestamp was recorded with.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutID(Uuid);

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[cfg(test)]
impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// An exercise as it occurs within a workout or routine.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub index: u32,
    pub title: String,
    pub notes: Option<String>,
    pub exercise_template_id: ExerciseTemplateID,
    pub superset_id: Option<u32>,
    pub sets: Vec<Set>,
}

impl WorkoutExercise {
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Set {
    pub index: u32,
    pub set_type: SetType,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub distance: Option<Distance>,
    pub duration: Option<Time>,
    pub rpe: Option<RPE>,
}

#[derive(
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "snake_case")]
pub enum SetType {
    #[default]
    Normal,
    Warmup,
    Dropset,
    Failure,
}

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    pub(crate) fn at(date: &str, time: &str) -> DateTime<FixedOffset> {
        let naive = chrono::NaiveDateTime::parse_from_str(
            &format!("{date} {time}"),
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();
        FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&naive)
            .unwrap()
    }

    pub(crate) fn set(weight: Option<f64>, reps: Option<u32>) -> Set {
        Set {
            weight: weight.map(|w| Weight::new(w).unwrap()),
            reps: reps.map(|r| Reps::new(r).unwrap()),
            ..Set::default()
        }
    }

    pub(crate) fn exercise(title: &str, sets: Vec<Set>) -> WorkoutExercise {
        WorkoutExercise {
            index: 0,
            title: title.to_string(),
            notes: None,
            exercise_template_id: ExerciseTemplateID::from(title.to_uppercase().as_str()),
            superset_id: None,
            sets,
        }
    }

    pub(crate) fn workout(id: u128, date: &str, exercises: Vec<WorkoutExercise>) -> Workout {
        Workout {
            id: id.into(),
            title: format!("Workout {id}"),
            description: None,
            start_time: at(date, "10:00:00"),
            end_time: at(date, "11:00:00"),
            exercises,
        }
    }

    #[test]
    fn test_workout_duration() {
        let mut w = workout(1, "2024-01-01", vec![]);
        w.end_time = at("2024-01-01", "11:15:30");
        assert_eq!(w.duration(), Duration::seconds(4530));
    }

    #[test]
    fn test_workout_num_sets() {
        let w = workout(
            1,
            "2024-01-01",
            vec![
                exercise("Squat", vec![set(Some(100.0), Some(5)), set(None, None)]),
                exercise("Plank", vec![]),
                exercise("Bench Press", vec![set(Some(60.0), Some(8))]),
            ],
        );
        assert_eq!(w.num_sets(), 3);
    }

    #[test]
    fn test_workout_date_uses_recorded_offset() {
        let mut w = workout(1, "2024-01-01", vec![]);
        w.start_time = DateTime::parse_from_rfc3339("2024-01-01T23:30:00-05:00").unwrap();
        assert_eq!(w.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_page_is_last() {
        let page = Page::<Workout> {
            page: 3,
            page_count: 3,
            items: vec![],
        };
        assert!(page.is_last());
        assert!(
            !Page::<Workout> {
                page: 1,
                page_count: 3,
                items: vec![]
            }
            .is_last()
        );
    }

    #[rstest]
    #[case("Bench Press (Barbell)", "bench", true)]
    #[case("Bench Press (Barbell)", "BARBELL", true)]
    #[case("Incline Bench Press", "decline", false)]
    #[case("Squat", "", true)]
    fn test_workout_exercise_matches(
        #[case] title: &str,
        #[case] query: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(exercise(title, vec![]).matches(query), expected);
    }

    #[rstest]
    #[case("normal", SetType::Normal)]
    #[case("warmup", SetType::Warmup)]
    #[case("dropset", SetType::Dropset)]
    #[case("failure", SetType::Failure)]
    fn test_set_type_from_str(#[case] value: &str, #[case] expected: SetType) {
        assert_eq!(SetType::from_str(value).unwrap(), expected);
        assert_eq!(expected.to_string(), value);
    }

    #[test]
    fn test_workout_id_display() {
        assert_eq!(
            WorkoutID::from(Uuid::from_u128(0x0a1b)).to_string(),
            "00000000-0000-0000-0000-000000000a1b"
        );
    }
}
