use std::collections::BTreeSet;

use derive_more::{Deref, Display};

use crate::{Page, ReadError};

pub trait ExerciseTemplateRepository {
    fn read_exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ExerciseTemplate>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub id: ExerciseTemplateID,
    pub title: String,
    pub primary_muscle_group: String,
    pub secondary_muscle_groups: BTreeSet<String>,
    pub equipment: String,
    pub is_custom: bool,
}

impl ExerciseTemplate {
    /// Template carrying only a reference and a title, as found inside routines and workouts.
    #[must_use]
    pub fn reference(id: ExerciseTemplateID, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            primary_muscle_group: String::new(),
            secondary_muscle_groups: BTreeSet::new(),
            equipment: String::new(),
            is_custom: false,
        }
    }
}

/// Search criteria for exercise templates. Unset criteria match every template.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseTemplateFilter {
    /// Case-insensitive substring of the title.
    pub query: String,
    /// Case-insensitive substring of the primary or any secondary muscle group.
    pub muscle: Option<String>,
    pub equipment: Option<String>,
}

impl ExerciseTemplateFilter {
    #[must_use]
    pub fn matches(&self, template: &ExerciseTemplate) -> bool {
        let contains = |value: &str, part: &str| value.to_lowercase().contains(&part.to_lowercase());

        contains(&template.title, &self.query)
            && self.muscle.as_deref().is_none_or(|muscle| {
                contains(&template.primary_muscle_group, muscle)
                    || template
                        .secondary_muscle_groups
                        .iter()
                        .any(|m| contains(m, muscle))
            })
            && self
                .equipment
                .as_deref()
                .is_none_or(|equipment| contains(&template.equipment, equipment))
    }
}

/// Identifier assigned by the service, e.g. `D04AC939`.
#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseTemplateID(String);

impl AsRef<str> for ExerciseTemplateID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ExerciseTemplateID {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ExerciseTemplateID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseTemplateID {
    fn from(value: String) -> Self {
        Self(value)
    }
}
