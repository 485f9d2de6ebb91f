use anyhow::{Context as _, Result};
use clap::Subcommand;
use ironlog_domain::{ExerciseTemplateFilter, ExerciseTemplateService};

use crate::Context;

#[derive(Subcommand)]
pub enum ExerciseCommand {
    /// List the exercise templates
    List {
        /// Page to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Show the templates of all pages
        #[arg(long, conflicts_with = "page")]
        all: bool,
    },
    /// Search exercise templates by title, muscle group and equipment
    Search {
        /// Title or a part of it
        query: String,
        /// Primary or secondary muscle group
        #[arg(long)]
        muscle: Option<String>,
        /// Required equipment
        #[arg(long)]
        equipment: Option<String>,
        /// Maximum number of results
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
        limit: u64,
    },
}

impl ExerciseCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        let service = context.service()?;

        let (templates, empty_message) = match self {
            ExerciseCommand::List { page, all } => (
                if all {
                    service.get_all_exercise_templates()
                } else {
                    service.get_exercise_templates(page).map(|page| page.items)
                },
                "No exercise templates found.",
            ),
            ExerciseCommand::Search {
                query,
                muscle,
                equipment,
                limit,
            } => (
                service.search_exercise_templates(
                    &ExerciseTemplateFilter {
                        query,
                        muscle,
                        equipment,
                    },
                    usize::try_from(limit)?,
                ),
                "No exercises found matching your search criteria.",
            ),
        };
        let templates = templates.context("failed to fetch exercise templates")?;

        if templates.is_empty() {
            println!("{empty_message}");
            return Ok(());
        }
        println!("{}", context.output.exercise_templates(&templates)?);
        Ok(())
    }
}
