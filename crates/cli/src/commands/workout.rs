use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Subcommand;
use ironlog_domain::{
    CreateError, NewWorkout, RoutineID, RoutineService, Session, SessionResult, Workout,
    WorkoutID, WorkoutService,
};
use log::debug;
use uuid::Uuid;

use crate::{Context, tui};

#[derive(Subcommand)]
pub enum WorkoutCommand {
    /// Log a workout in an interactive terminal session
    Start {
        /// Take the exercises from a routine
        #[arg(long, value_name = "ID", conflicts_with = "workout")]
        routine: Option<Uuid>,
        /// Repeat the exercises of a previous workout
        #[arg(long, value_name = "ID")]
        workout: Option<Uuid>,
        /// Title of the workout
        #[arg(long)]
        title: Option<String>,
        /// Do not save the workout when finished
        #[arg(long)]
        no_save: bool,
    },
}

impl WorkoutCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        let WorkoutCommand::Start {
            routine,
            workout,
            title,
            no_save,
        } = self;

        let service = context.service()?;
        let now = Local::now().fixed_offset();

        let session = match (routine, workout) {
            (Some(id), _) => Session::from_routine(
                &service
                    .get_routine(RoutineID::from(id))
                    .context("failed to load routine")?,
                now,
            ),
            (None, Some(id)) => Session::from_workout(
                &service
                    .get_workout(WorkoutID::from(id))
                    .context("failed to load workout")?,
                now,
            ),
            (None, None) => Session::blank(now),
        };
        let session = match title {
            Some(title) => session.with_title(&title),
            None => session,
        };
        debug!(
            "starting session \"{}\" with {} exercises",
            session.title(),
            session.exercises().len()
        );

        let result = tui::run(session).context("failed to run workout session")?;

        conclude(
            &result,
            no_save,
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
            |workout| service.create_workout(workout),
        )
    }
}

/// Report the outcome of a session and save it if the user agrees.
fn conclude(
    result: &SessionResult,
    no_save: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
    save: impl FnOnce(NewWorkout) -> Result<Workout, CreateError>,
) -> Result<()> {
    if !result.is_finished() {
        writeln!(output, "\nWorkout cancelled.")?;
        return Ok(());
    }

    writeln!(output, "\nWorkout completed!")?;
    writeln!(output, "Exercises: {}", result.exercises.len())?;
    writeln!(
        output,
        "Sets completed: {}/{}",
        result.num_completed_sets(),
        result.num_sets()
    )?;

    if no_save {
        writeln!(output, "\nWorkout not saved (--no-save flag used).")?;
        return Ok(());
    }

    let Ok(new_workout) = NewWorkout::try_from(result) else {
        writeln!(output, "\nNo completed sets to save.")?;
        return Ok(());
    };

    if !confirm("\nSave workout? (yes/no): ", input, output)? {
        writeln!(output, "\nWorkout not saved.")?;
        return Ok(());
    }

    let workout = save(new_workout).context("failed to save workout")?;
    writeln!(output, "\nWorkout saved successfully!")?;
    writeln!(output, "ID: {}", workout.id)?;

    Ok(())
}

fn confirm(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "yes" | "y"))
}
