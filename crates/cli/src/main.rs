#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod log;
mod output;
mod tui;

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use ironlog_domain::Service;
use ironlog_storage::{REST, ReqwestSendRequest};

use commands::{
    config::ConfigCommand, exercise::ExerciseCommand, folder::FolderCommand,
    routine::RoutineCommand, stats::StatsCommand, workout::WorkoutCommand,
};
use config::Config;
use output::{Output, OutputFormat};

/// Log workouts in the terminal and analyze your training history.
#[derive(Parser)]
#[command(name = "ironlog", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file [default: <config dir>/ironlog/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Show debug messages
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Show errors only
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze the workout history
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Log a workout
    #[command(subcommand)]
    Workout(WorkoutCommand),
    /// Browse the saved routines
    #[command(subcommand)]
    Routine(RoutineCommand),
    /// Browse the routine folders
    #[command(subcommand)]
    Folder(FolderCommand),
    /// Browse the exercise templates
    #[command(subcommand)]
    Exercise(ExerciseCommand),
    /// Manage the configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub output: Output,
}

impl Context {
    pub fn service(&self) -> Result<Service<REST<ReqwestSendRequest>>> {
        let api_key = self.config.api_key()?;
        Ok(Service::new(REST::new(&self.config.api.base_url, api_key)?))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = log::init(log::level(cli.verbose, cli.quiet)) {
        eprintln!("Error: {err}");
    }

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = Config::load(&config_path)?;
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(format) = cli.output {
        config.display.output_format = format;
    }
    if cli.no_color {
        config.display.color = false;
    }

    let output = Output {
        format: config.display.output_format,
        color: config.display.color && io::stdout().is_terminal(),
    };
    let context = Context {
        config,
        config_path,
        output,
    };

    match cli.command {
        Command::Stats(command) => command.run(&context),
        Command::Workout(command) => command.run(&context),
        Command::Routine(command) => command.run(&context),
        Command::Folder(command) => command.run(&context),
        Command::Exercise(command) => command.run(&context),
        Command::Config(command) => command.run(&context),
    }
}
