use anyhow::{Context as _, Result};
use clap::Subcommand;
use ironlog_domain::RoutineService;

use crate::Context;

#[derive(Subcommand)]
pub enum FolderCommand {
    /// List the routine folders
    List,
}

impl FolderCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        let FolderCommand::List = self;
        let mut folders = context
            .service()?
            .get_all_routine_folders()
            .context("failed to fetch routine folders")?;

        if folders.is_empty() {
            println!("No routine folders found.");
            return Ok(());
        }
        folders.sort_by_key(|f| f.index);
        println!("{}", context.output.routine_folders(&folders)?);
        Ok(())
    }
}
