use anyhow::{Context as _, Result};
use clap::Subcommand;
use ironlog_domain::{Routine, RoutineFolderID, RoutineService};

use crate::Context;

#[derive(Subcommand)]
pub enum RoutineCommand {
    /// List the saved routines
    List {
        /// Page to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Show the routines of all pages
        #[arg(long, conflicts_with = "page")]
        all: bool,
        /// Only routines of this folder
        #[arg(long, value_name = "ID")]
        folder: Option<u64>,
    },
}

impl RoutineCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        let RoutineCommand::List { page, all, folder } = self;
        let service = context.service()?;

        let routines = if all {
            service.get_all_routines()
        } else {
            service.get_routines(page).map(|page| page.items)
        }
        .context("failed to fetch routines")?;
        let routines = in_folder(routines, folder.map(RoutineFolderID::from));

        if routines.is_empty() {
            println!("No routines found.");
            return Ok(());
        }
        println!("{}", context.output.routines(&routines)?);
        Ok(())
    }
}

fn in_folder(routines: Vec<Routine>, folder: Option<RoutineFolderID>) -> Vec<Routine> {
    routines
        .into_iter()
        .filter(|r| folder.is_none_or(|id| r.folder_id == Some(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn routine(id: u128, folder: Option<u64>) -> Routine {
        Routine {
            id: Uuid::from_u128(id).into(),
            title: format!("Routine {id}"),
            folder_id: folder.map(RoutineFolderID::from),
            exercises: vec![],
        }
    }

    #[rstest]
    #[case::any_folder(None, vec!["Routine 1", "Routine 2", "Routine 3"])]
    #[case::folder(Some(7), vec!["Routine 2"])]
    #[case::unknown_folder(Some(8), vec![])]
    fn test_in_folder(#[case] folder: Option<u64>, #[case] expected: Vec<&str>) {
        let routines = vec![routine(1, None), routine(2, Some(7)), routine(3, Some(9))];

        assert_eq!(
            in_folder(routines, folder.map(RoutineFolderID::from))
                .into_iter()
                .map(|r| r.title)
                .collect::<Vec<_>>(),
            expected
        );
    }
}
