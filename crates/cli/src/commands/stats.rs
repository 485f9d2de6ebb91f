use anyhow::{Context as _, Result, bail};
use chrono::Local;
use clap::Subcommand;
use ironlog_domain::{Metric, Period, ProgressQuery, RecordsQuery, WorkoutService};
use log::info;

use crate::Context;

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Show the development of an exercise over time
    Progress {
        /// Exercise title or a part of it
        exercise: String,
        /// Metric to track: weight, volume, reps or 1rm
        #[arg(long, default_value = "weight")]
        metric: Metric,
        /// Time period: week, month, year or all
        #[arg(long, default_value = "all")]
        period: Period,
    },
    /// Show personal records
    Records {
        /// Only records of exercises matching this title
        #[arg(long)]
        exercise: Option<String>,
        /// Maximum number of records
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Summarize the training of a period
    Summary {
        /// Time period: week, month, year or all
        #[arg(long, default_value = "month")]
        period: Period,
    },
}

impl StatsCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        let service = context.service()?;
        let now = Local::now().fixed_offset();

        info!("Fetching workout data...");

        let rendered = match self {
            StatsCommand::Progress {
                exercise,
                metric,
                period,
            } => {
                let progress = service
                    .get_progress(&ProgressQuery {
                        exercise: exercise.clone(),
                        metric,
                        range: period.range(now),
                    })
                    .context("failed to fetch workouts")?;
                if progress.is_empty() {
                    bail!("no data found for exercise '{exercise}'");
                }
                context.output.progress(&progress)?
            }
            StatsCommand::Records { exercise, limit } => {
                let records = service
                    .get_personal_records(&RecordsQuery { exercise, limit })
                    .context("failed to fetch workouts")?;
                if records.is_empty() {
                    println!("No personal records found.");
                    return Ok(());
                }
                context.output.records(&records)?
            }
            StatsCommand::Summary { period } => {
                let summary = service
                    .get_summary(&period.range(now))
                    .context("failed to fetch workouts")?;
                context.output.summary(&summary)?
            }
        };

        println!("{rendered}");
        Ok(())
    }
}
