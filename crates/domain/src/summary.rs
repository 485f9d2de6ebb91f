use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};

use crate::{DateRange, Workout, volume};

const MOST_FREQUENT_EXERCISES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub workouts: WorkoutStats,
    pub volume: VolumeStats,
    pub exercises: ExerciseStats,
    pub consistency: Consistency,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WorkoutStats {
    pub total: usize,
    pub average_duration_minutes: f64,
    pub total_duration_hours: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VolumeStats {
    pub total_kg: f64,
    pub average_per_workout_kg: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseStats {
    pub unique_count: usize,
    pub total_sets: usize,
    pub most_frequent: Vec<ExerciseFrequency>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseFrequency {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Consistency {
    pub workouts_per_week: f64,
    pub longest_streak_days: u32,
    pub current_streak_days: u32,
}

/// Statistics of all workouts starting within `range`.
#[must_use]
pub fn summary(workouts: &[Workout], range: &DateRange) -> Summary {
    let workouts = range.filter(workouts);
    let end = range.end.date_naive();

    #[allow(clippy::cast_precision_loss)]
    let total = workouts.len() as f64;

    let mut total_minutes = 0.0;
    let mut total_volume = 0.0;
    let mut total_sets = 0;
    let mut exercise_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dates = BTreeSet::new();

    for workout in &workouts {
        #[allow(clippy::cast_precision_loss)]
        let minutes = workout.duration().num_seconds() as f64 / 60.0;
        total_minutes += minutes;
        dates.insert(workout.date());

        for exercise in &workout.exercises {
            *exercise_counts.entry(exercise.title.as_str()).or_default() += 1;
            total_sets += exercise.sets.len();
            total_volume += volume(&exercise.sets).unwrap_or_default();
        }
    }

    let mut most_frequent = exercise_counts
        .iter()
        .map(|(name, count)| ExerciseFrequency {
            name: (*name).to_string(),
            count: *count,
        })
        .collect::<Vec<_>>();
    // Names are already in ascending order, so the stable sort keeps ties alphabetical.
    most_frequent.sort_by(|a, b| b.count.cmp(&a.count));
    most_frequent.truncate(MOST_FREQUENT_EXERCISES);

    let weeks = range.days() / 7.0;
    let (longest_streak_days, current_streak_days) = streaks(&dates, end);

    Summary {
        start: range.start.date_naive(),
        end,
        workouts: WorkoutStats {
            total: workouts.len(),
            average_duration_minutes: average(total_minutes, total),
            total_duration_hours: total_minutes / 60.0,
        },
        volume: VolumeStats {
            total_kg: total_volume,
            average_per_workout_kg: average(total_volume, total),
        },
        exercises: ExerciseStats {
            unique_count: exercise_counts.len(),
            total_sets,
            most_frequent,
        },
        consistency: Consistency {
            workouts_per_week: if weeks >= 1.0 { total / weeks } else { 0.0 },
            longest_streak_days,
            current_streak_days,
        },
    }
}

fn average(sum: f64, count: f64) -> f64 {
    if count > 0.0 { sum / count } else { 0.0 }
}

/// Longest and current run of consecutive training days.
///
/// The current streak counts the days with a workout backwards from `end`, so it is
/// zero whenever `end` itself has none.
#[must_use]
pub fn streaks(dates: &BTreeSet<NaiveDate>, end: NaiveDate) -> (u32, u32) {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(p) if p.checked_add_days(Days::new(1)) == Some(*date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*date);
    }

    let yesterday = end.checked_sub_days(Days::new(1));
    if !dates.contains(&end) && !yesterday.is_some_and(|d| dates.contains(&d)) {
        return (longest, 0);
    }

    let mut day = Some(end);
    let mut current = 0;
    while let Some(d) = day.filter(|d| dates.contains(d)) {
        current += 1;
        day = d.checked_sub_days(Days::new(1));
    }

    (longest, current)
}
