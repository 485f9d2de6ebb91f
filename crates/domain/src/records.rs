use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{Reps, Workout, WorkoutExercise, WorkoutID, estimated_one_rep_max, round_to};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsQuery {
    /// Case-insensitive substring of the exercise title.
    pub exercise: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise: String,
    pub record_type: RecordType,
    pub value: f64,
    /// Repetitions of the set the record was achieved with. Not defined for volume records.
    pub reps: Option<Reps>,
    pub date: NaiveDate,
    pub workout_id: WorkoutID,
}

impl PersonalRecord {
    #[must_use]
    pub fn unit(&self) -> &'static str {
        "kg"
    }
}

#[derive(
    strum::Display, strum::IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum RecordType {
    #[strum(serialize = "weight")]
    Weight,
    #[strum(serialize = "estimated_1rm")]
    EstimatedOneRepMax,
    #[strum(serialize = "volume")]
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Best {
    value: f64,
    reps: Option<Reps>,
    date: NaiveDate,
    workout_id: WorkoutID,
}

#[derive(Debug, Default)]
struct ExerciseRecords {
    weight: Option<Best>,
    one_rep_max: Option<Best>,
    volume: Option<Best>,
}

/// Session bests of one exercise occurrence.
#[derive(Debug, Default)]
struct SessionBests {
    weight: Option<(f64, Option<Reps>)>,
    one_rep_max: Option<(f64, Option<Reps>)>,
    volume: f64,
}

impl SessionBests {
    fn of(exercise: &WorkoutExercise) -> Self {
        let mut bests = Self::default();

        for set in &exercise.sets {
            let Some(weight) = set.weight else {
                continue;
            };
            let weight_value = f64::from(weight);

            if bests.weight.is_none_or(|(best, _)| weight_value > best) {
                bests.weight = Some((weight_value, set.reps));
            }

            let Some(reps) = set.reps else {
                continue;
            };

            bests.volume += weight_value * f64::from(reps);

            if let Some(estimate) = estimated_one_rep_max(weight, reps) {
                if bests.one_rep_max.is_none_or(|(best, _)| estimate > best) {
                    bests.one_rep_max = Some((estimate, Some(reps)));
                }
            }
        }

        bests
    }
}

fn update(best: &mut Option<Best>, candidate: Best) {
    if candidate.value > 0.0 && best.is_none_or(|b| candidate.value > b.value) {
        *best = Some(candidate);
    }
}

/// Best weight, estimated 1RM and volume for every exercise, sorted by value descending.
#[must_use]
pub fn personal_records(workouts: &[Workout], query: &RecordsQuery) -> Vec<PersonalRecord> {
    let mut records: BTreeMap<&str, ExerciseRecords> = BTreeMap::new();

    for workout in workouts {
        let date = workout.date();

        for exercise in &workout.exercises {
            if let Some(filter) = &query.exercise {
                if !exercise.matches(filter) {
                    continue;
                }
            }

            let bests = SessionBests::of(exercise);
            let entry = records.entry(exercise.title.as_str()).or_default();
            let achieved = |value: f64, reps: Option<Reps>| Best {
                value,
                reps,
                date,
                workout_id: workout.id,
            };

            if let Some((value, reps)) = bests.weight {
                update(&mut entry.weight, achieved(value, reps));
            }
            if let Some((value, reps)) = bests.one_rep_max {
                update(&mut entry.one_rep_max, achieved(value, reps));
            }
            update(&mut entry.volume, achieved(bests.volume, None));
        }
    }

    let mut result = records
        .into_iter()
        .flat_map(|(exercise, records)| {
            [
                (RecordType::Weight, records.weight),
                (RecordType::EstimatedOneRepMax, records.one_rep_max),
                (RecordType::Volume, records.volume),
            ]
            .into_iter()
            .filter_map(move |(record_type, best)| {
                best.map(|best| PersonalRecord {
                    exercise: exercise.to_string(),
                    record_type,
                    value: round_to(best.value, 1),
                    reps: best.reps,
                    date: best.date,
                    workout_id: best.workout_id,
                })
            })
        })
        .collect::<Vec<_>>();

    result.sort_by(|a, b| b.value.total_cmp(&a.value));
    result.truncate(query.limit);
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::workout::tests::{exercise, set, workout};

    use super::*;

    fn query(exercise: Option<&str>, limit: usize) -> RecordsQuery {
        RecordsQuery {
            exercise: exercise.map(str::to_string),
            limit,
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn summary(records: &[PersonalRecord]) -> Vec<(&str, RecordType, f64)> {
        records
            .iter()
            .map(|r| (r.exercise.as_str(), r.record_type, r.value))
            .collect()
    }

    fn workouts() -> Vec<Workout> {
        vec![
            workout(
                1,
                "2024-01-10",
                vec![
                    exercise(
                        "Bench Press",
                        vec![set(Some(80.0), Some(8)), set(Some(90.0), Some(3))],
                    ),
                    exercise("Squat", vec![set(Some(120.0), Some(5))]),
                ],
            ),
            workout(
                2,
                "2024-02-10",
                vec![exercise(
                    "Bench Press",
                    vec![set(Some(95.0), Some(1)), set(Some(60.0), Some(20))],
                )],
            ),
        ]
    }

    #[test]
    fn test_personal_records() {
        let records = personal_records(&workouts(), &query(None, 10));

        assert_eq!(
            summary(&records),
            vec![
                ("Bench Press", RecordType::Volume, 1_295.0),
                ("Squat", RecordType::Volume, 600.0),
                ("Squat", RecordType::EstimatedOneRepMax, 135.0),
                ("Squat", RecordType::Weight, 120.0),
                ("Bench Press", RecordType::EstimatedOneRepMax, 99.3),
                ("Bench Press", RecordType::Weight, 95.0),
            ]
        );
    }

    #[test]
    fn test_personal_records_carry_origin() {
        let records = personal_records(&workouts(), &query(Some("bench"), 10));

        let weight = records
            .iter()
            .find(|r| r.record_type == RecordType::Weight)
            .unwrap();
        assert_eq!(weight.reps, Some(Reps::new(1).unwrap()));
        assert_eq!(weight.date, date("2024-02-10"));
        assert_eq!(weight.workout_id, 2.into());

        let one_rep_max = records
            .iter()
            .find(|r| r.record_type == RecordType::EstimatedOneRepMax)
            .unwrap();
        assert_eq!(one_rep_max.reps, Some(Reps::new(8).unwrap()));
        assert_eq!(one_rep_max.date, date("2024-01-10"));
        assert_eq!(one_rep_max.workout_id, 1.into());

        let volume = records
            .iter()
            .find(|r| r.record_type == RecordType::Volume)
            .unwrap();
        assert_eq!(volume.reps, None);
        assert_eq!(volume.workout_id, 2.into());
        assert_eq!(volume.unit(), "kg");
    }

    #[rstest]
    #[case::limit(None, 2, 2)]
    #[case::zero_limit(None, 0, 0)]
    #[case::filter(Some("SQU"), 10, 3)]
    #[case::no_match(Some("Deadlift"), 10, 0)]
    fn test_personal_records_query(
        #[case] exercise: Option<&str>,
        #[case] limit: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(
            personal_records(&workouts(), &query(exercise, limit)).len(),
            expected
        );
    }

    #[test]
    fn test_personal_records_exclude_sets_above_ten_reps_from_one_rep_max() {
        let workouts = vec![workout(
            1,
            "2024-01-10",
            vec![exercise(
                "Bench Press",
                vec![set(Some(100.0), Some(5)), set(Some(120.0), Some(11))],
            )],
        )];

        let records = personal_records(&workouts, &query(None, 10));

        let one_rep_max = records
            .iter()
            .find(|r| r.record_type == RecordType::EstimatedOneRepMax)
            .unwrap();
        assert_eq!(one_rep_max.value, 112.5);
        assert_eq!(one_rep_max.reps, Some(Reps::new(5).unwrap()));
    }

    #[test]
    fn test_personal_records_without_weight() {
        let workouts = vec![workout(
            1,
            "2024-01-10",
            vec![
                exercise("Pull Up", vec![set(None, Some(12))]),
                exercise("Plank", vec![]),
                exercise("Push Up", vec![set(Some(0.0), Some(30))]),
            ],
        )];

        assert_eq!(personal_records(&workouts, &query(None, 10)), vec![]);
    }

    #[test]
    fn test_personal_records_weight_without_reps() {
        let workouts = vec![workout(
            1,
            "2024-01-10",
            vec![exercise("Farmer's Walk", vec![set(Some(50.0), None)])],
        )];

        let records = personal_records(&workouts, &query(None, 10));

        assert_eq!(
            summary(&records),
            vec![("Farmer's Walk", RecordType::Weight, 50.0)]
        );
        assert_eq!(records[0].reps, None);
    }

    #[test]
    fn test_personal_records_first_seen_wins_on_tie() {
        let workouts = vec![
            workout(
                1,
                "2024-01-10",
                vec![exercise("Squat", vec![set(Some(100.0), Some(5))])],
            ),
            workout(
                2,
                "2024-01-17",
                vec![exercise("Squat", vec![set(Some(100.0), Some(5))])],
            ),
        ];

        let records = personal_records(&workouts, &query(None, 10));

        assert!(records.iter().all(|r| r.workout_id == 1.into()));
    }

    #[test]
    fn test_record_type_display() {
        assert_eq!(RecordType::EstimatedOneRepMax.to_string(), "estimated_1rm");
        assert_eq!(RecordType::Volume.to_string(), "volume");
    }
}
