use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{Page, ReadError, WorkoutExercise};

pub trait RoutineRepository {
    fn read_routines(&self, page: u32, page_size: u32) -> Result<Page<Routine>, ReadError>;
    fn read_routine(&self, id: RoutineID) -> Result<Routine, ReadError>;
    fn read_routine_folders(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<RoutineFolder>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: RoutineID,
    pub title: String,
    pub folder_id: Option<RoutineFolderID>,
    pub exercises: Vec<WorkoutExercise>,
}

impl Routine {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutineID(Uuid);

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[cfg(test)]
impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineFolder {
    pub id: RoutineFolderID,
    pub title: String,
    pub index: u32,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutineFolderID(u64);

impl From<u64> for RoutineFolderID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::workout::tests::{exercise, set};

    use super::*;

    #[test]
    fn test_routine_num_sets() {
        let routine = Routine {
            id: 1.into(),
            title: String::from("Push"),
            folder_id: Some(7.into()),
            exercises: vec![
                exercise("Bench Press", vec![set(None, None), set(None, None)]),
                exercise("Dips", vec![set(None, Some(10))]),
            ],
        };
        assert_eq!(routine.num_sets(), 3);
    }

    #[test]
    fn test_routine_id_from_u128() {
        assert_eq!(
            RoutineID::from(1).to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }
}
