use chrono::{DateTime, Days, FixedOffset, Months, NaiveDate, TimeZone};

use crate::{Reps, Set, Weight, Workout};

/// Sets with more repetitions than this are excluded from 1RM estimation.
const MAX_REPS_FOR_ONE_REP_MAX: u32 = 10;

/// Time span of workouts to consider.
///
/// Bounds are exclusive on both ends. A workout starting exactly at `start` or
/// `end` is outside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    #[must_use]
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, time: &DateTime<FixedOffset>) -> bool {
        *time > self.start && *time < self.end
    }

    #[must_use]
    pub fn filter<'a>(&self, workouts: &'a [Workout]) -> Vec<&'a Workout> {
        workouts
            .iter()
            .filter(|w| self.contains(&w.start_time))
            .collect()
    }

    #[must_use]
    pub fn days(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let seconds = (self.end - self.start).num_seconds() as f64;
        seconds / 86_400.0
    }
}

#[derive(
    strum::Display, strum::EnumString, strum::VariantNames, Debug, Clone, Copy, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Range ending at `now` and reaching back by the length of the period.
    #[must_use]
    pub fn range(self, now: DateTime<FixedOffset>) -> DateRange {
        let start = match self {
            Period::Week => now.checked_sub_days(Days::new(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Year => now.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
        .unwrap_or_else(|| beginning_of_records(now.timezone()));
        DateRange::new(start, now)
    }
}

fn beginning_of_records(offset: FixedOffset) -> DateTime<FixedOffset> {
    let midnight = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    offset
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or_else(|| DateTime::<FixedOffset>::from_naive_utc_and_offset(midnight, offset))
}

#[derive(
    strum::Display, strum::EnumString, strum::VariantNames, Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Metric {
    #[strum(serialize = "weight")]
    Weight,
    #[strum(serialize = "volume")]
    Volume,
    #[strum(serialize = "reps")]
    Reps,
    #[strum(serialize = "1rm")]
    EstimatedOneRepMax,
}

impl Metric {
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Weight | Metric::Volume => "kg",
            Metric::Reps => "reps",
            Metric::EstimatedOneRepMax => "kg (estimated)",
        }
    }

    /// Value of this metric for one exercise occurrence, or `None` if no set
    /// records the required fields.
    #[must_use]
    pub fn evaluate(self, sets: &[Set]) -> Option<f64> {
        match self {
            Metric::Weight => max_weight(sets).map(f64::from),
            Metric::Volume => volume(sets),
            Metric::Reps => max_reps(sets).map(f64::from),
            Metric::EstimatedOneRepMax => sets
                .iter()
                .filter_map(|s| estimated_one_rep_max(s.weight?, s.reps?))
                .reduce(f64::max),
        }
    }
}

#[must_use]
pub fn max_weight(sets: &[Set]) -> Option<Weight> {
    sets.iter()
        .filter_map(|s| s.weight)
        .reduce(|a, b| if b > a { b } else { a })
}

#[must_use]
pub fn max_reps(sets: &[Set]) -> Option<Reps> {
    sets.iter().filter_map(|s| s.reps).max()
}

/// Sum of weight × reps over all sets recording both.
#[must_use]
pub fn volume(sets: &[Set]) -> Option<f64> {
    sets.iter()
        .filter_map(|s| Some(f64::from(s.weight?) * f64::from(s.reps?)))
        .reduce(|a, b| a + b)
}

/// Brzycki estimate of the one-repetition maximum.
///
/// Only defined for 1 to 10 repetitions. Sets outside this range yield `None`.
#[must_use]
pub fn estimated_one_rep_max(weight: Weight, reps: Reps) -> Option<f64> {
    let reps = u32::from(reps);
    if reps == 0 || reps > MAX_REPS_FOR_ONE_REP_MAX {
        return None;
    }
    Some(f64::from(weight) * (36.0 / (37.0 - f64::from(reps))))
}

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
