use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{DateRange, Metric, Workout, round_to};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressQuery {
    /// Case-insensitive substring of the exercise title.
    pub exercise: String,
    pub metric: Metric,
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Title of the first matching exercise, or the query if nothing matched.
    pub exercise: String,
    pub metric: Metric,
    pub points: Vec<ProgressPoint>,
    pub analysis: TrendAnalysis,
}

impl Progress {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn unit(&self) -> &'static str {
        self.metric.unit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    pub starting_value: f64,
    pub current_value: f64,
    pub absolute_change: f64,
    pub percent_change: f64,
    pub trend: Trend,
}

#[derive(strum::Display, strum::IntoStaticStr, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    #[default]
    InsufficientData,
}

/// Best value of the selected metric per calendar day for all matching exercises.
#[must_use]
pub fn progress(workouts: &[Workout], query: &ProgressQuery) -> Progress {
    let mut best_per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut matched_exercise: Option<&str> = None;

    for workout in workouts {
        if !query.range.contains(&workout.start_time) {
            continue;
        }

        for exercise in &workout.exercises {
            if !exercise.matches(&query.exercise) {
                continue;
            }

            matched_exercise.get_or_insert(exercise.title.as_str());

            if let Some(value) = query
                .metric
                .evaluate(&exercise.sets)
                .filter(|value| *value > 0.0)
            {
                best_per_day
                    .entry(workout.date())
                    .and_modify(|best| *best = best.max(value))
                    .or_insert(value);
            }
        }
    }

    let points = best_per_day
        .into_iter()
        .map(|(date, value)| ProgressPoint {
            date,
            value: round_to(value, 2),
        })
        .collect::<Vec<_>>();

    Progress {
        exercise: matched_exercise.map_or_else(|| query.exercise.clone(), str::to_string),
        metric: query.metric,
        analysis: analyze(&points),
        points,
    }
}

fn analyze(points: &[ProgressPoint]) -> TrendAnalysis {
    match points {
        [] => TrendAnalysis::default(),
        [point] => TrendAnalysis {
            starting_value: point.value,
            current_value: point.value,
            ..TrendAnalysis::default()
        },
        [first, .., last] => {
            let (first, last) = (first.value, last.value);
            TrendAnalysis {
                starting_value: first,
                current_value: last,
                absolute_change: round_to(last - first, 2),
                percent_change: if first > 0.0 {
                    round_to((last - first) / first * 100.0, 2)
                } else {
                    0.0
                },
                trend: if last > first {
                    Trend::Increasing
                } else if last < first {
                    Trend::Decreasing
                } else {
                    Trend::Stable
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::workout::tests::{at, exercise, set, workout};

    use super::*;

    fn query(exercise: &str, metric: Metric) -> ProgressQuery {
        ProgressQuery {
            exercise: exercise.to_string(),
            metric,
            range: DateRange::new(at("2024-01-01", "00:00:00"), at("2024-12-31", "00:00:00")),
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_progress_keeps_maximum_per_day() {
        let mut second = workout(
            2,
            "2024-02-01",
            vec![exercise("Bench Press", vec![set(Some(95.0), Some(3))])],
        );
        second.start_time = at("2024-02-01", "18:00:00");
        let workouts = vec![
            workout(
                1,
                "2024-02-01",
                vec![exercise("Bench Press", vec![set(Some(80.0), Some(5))])],
            ),
            second,
        ];

        let result = progress(&workouts, &query("bench", Metric::Weight));

        assert_eq!(
            result.points,
            vec![ProgressPoint {
                date: date("2024-02-01"),
                value: 95.0
            }]
        );
    }

    #[test]
    fn test_progress_series_is_sorted_and_analyzed() {
        let workouts = vec![
            workout(
                3,
                "2024-03-01",
                vec![exercise("Squat (Barbell)", vec![set(Some(110.0), Some(5))])],
            ),
            workout(
                1,
                "2024-01-10",
                vec![exercise("Squat (Barbell)", vec![set(Some(100.0), Some(5))])],
            ),
            workout(
                2,
                "2024-02-10",
                vec![
                    exercise("Bench Press", vec![set(Some(200.0), Some(1))]),
                    exercise("Squat (Barbell)", vec![set(Some(105.0), Some(5))]),
                ],
            ),
        ];

        let result = progress(&workouts, &query("SQUAT", Metric::Weight));

        assert_eq!(result.exercise, "Squat (Barbell)");
        assert_eq!(
            result.points.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![100.0, 105.0, 110.0]
        );
        assert_eq!(result.points[0].date, date("2024-01-10"));
        assert_eq!(result.analysis.starting_value, 100.0);
        assert_eq!(result.analysis.current_value, 110.0);
        assert_eq!(result.analysis.absolute_change, 10.0);
        assert_approx_eq!(result.analysis.percent_change, 10.0);
        assert_eq!(result.analysis.trend, Trend::Increasing);
    }

    #[test]
    fn test_progress_ignores_workouts_outside_range() {
        let workouts = vec![
            workout(
                1,
                "2023-12-31",
                vec![exercise("Deadlift", vec![set(Some(180.0), Some(1))])],
            ),
            workout(
                2,
                "2024-06-01",
                vec![exercise("Deadlift", vec![set(Some(150.0), Some(3))])],
            ),
        ];

        let result = progress(&workouts, &query("deadlift", Metric::Weight));

        assert_eq!(result.points.len(), 1);
        assert_eq!(result.points[0].value, 150.0);
        assert_eq!(result.analysis.trend, Trend::InsufficientData);
        assert_eq!(result.analysis.starting_value, 150.0);
        assert_eq!(result.analysis.current_value, 150.0);
    }

    #[test]
    fn test_progress_without_match_is_empty() {
        let workouts = vec![
            workout(1, "2024-02-01", vec![]),
            workout(
                2,
                "2024-02-02",
                vec![exercise("Bench Press", vec![set(Some(80.0), Some(5))])],
            ),
        ];

        let result = progress(&workouts, &query("Overhead Press", Metric::Weight));

        assert!(result.is_empty());
        assert_eq!(result.exercise, "Overhead Press");
        assert_eq!(result.analysis, TrendAnalysis::default());
    }

    #[test]
    fn test_progress_skips_occurrences_without_data() {
        let workouts = vec![
            workout(
                1,
                "2024-02-01",
                vec![exercise("Pull Up", vec![set(None, Some(8)), set(None, None)])],
            ),
            workout(2, "2024-02-02", vec![exercise("Pull Up", vec![])]),
        ];

        let weight = progress(&workouts, &query("pull up", Metric::Weight));
        let reps = progress(&workouts, &query("pull up", Metric::Reps));

        assert!(weight.is_empty());
        assert_eq!(weight.exercise, "Pull Up");
        assert_eq!(
            reps.points,
            vec![ProgressPoint {
                date: date("2024-02-01"),
                value: 8.0
            }]
        );
    }

    #[test]
    fn test_progress_skips_zero_values() {
        let workouts = vec![
            workout(
                1,
                "2024-02-01",
                vec![exercise("Push Up", vec![set(Some(0.0), Some(20))])],
            ),
            workout(
                2,
                "2024-02-02",
                vec![exercise("Push Up", vec![set(Some(0.0), Some(0))])],
            ),
        ];

        let weight = progress(&workouts, &query("push up", Metric::Weight));
        let reps = progress(&workouts, &query("push up", Metric::Reps));

        assert!(weight.is_empty());
        assert_eq!(
            reps.points,
            vec![ProgressPoint {
                date: date("2024-02-01"),
                value: 20.0
            }]
        );
    }

    #[test]
    fn test_progress_rounds_to_two_decimals() {
        let workouts = vec![workout(
            1,
            "2024-02-01",
            vec![exercise("Bench Press", vec![set(Some(100.0), Some(3))])],
        )];

        let result = progress(&workouts, &query("bench", Metric::EstimatedOneRepMax));

        assert_eq!(result.points[0].value, 105.88);
        assert_eq!(result.unit(), "kg (estimated)");
    }

    #[rstest]
    #[case::increasing(&[50.0, 40.0, 75.0], 25.0, 50.0, Trend::Increasing)]
    #[case::decreasing(&[80.0, 60.0], -20.0, -25.0, Trend::Decreasing)]
    #[case::stable(&[60.0, 70.0, 60.0], 0.0, 0.0, Trend::Stable)]
    #[case::zero_start(&[0.0, 50.0], 50.0, 0.0, Trend::Increasing)]
    fn test_analyze(
        #[case] values: &[f64],
        #[case] absolute_change: f64,
        #[case] percent_change: f64,
        #[case] trend: Trend,
    ) {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, value)| ProgressPoint {
                date: date("2024-01-01") + chrono::Days::new(i as u64),
                value: *value,
            })
            .collect::<Vec<_>>();

        let analysis = analyze(&points);

        assert_eq!(analysis.starting_value, values[0]);
        assert_eq!(analysis.current_value, values[values.len() - 1]);
        assert_approx_eq!(analysis.absolute_change, absolute_change);
        assert_approx_eq!(analysis.percent_change, percent_change);
        assert_eq!(analysis.trend, trend);
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::InsufficientData.to_string(), "insufficient_data");
        assert_eq!(Trend::Increasing.to_string(), "increasing");
    }
}
