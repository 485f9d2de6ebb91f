use log::{debug, error};

use crate::{
    CreateError, DateRange, ExerciseTemplate, ExerciseTemplateFilter, ExerciseTemplateRepository,
    NewWorkout, Page, PersonalRecord, Progress, ProgressQuery, ReadError, RecordsQuery, Routine, RoutineFolder,
    RoutineID, RoutineRepository, Summary, Workout, WorkoutID, WorkoutRepository, personal_records,
    progress, summary,
};

/// Number of entries requested per page when walking through a listing.
pub const PAGE_SIZE: u32 = 10;

pub trait WorkoutService {
    fn get_workouts(&self, page: u32) -> Result<Page<Workout>, ReadError>;
    fn get_all_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;

    fn get_progress(&self, query: &ProgressQuery) -> Result<Progress, ReadError> {
        Ok(progress(&self.get_all_workouts()?, query))
    }

    fn get_personal_records(&self, query: &RecordsQuery) -> Result<Vec<PersonalRecord>, ReadError> {
        Ok(personal_records(&self.get_all_workouts()?, query))
    }

    fn get_summary(&self, range: &DateRange) -> Result<Summary, ReadError> {
        Ok(summary(&self.get_all_workouts()?, range))
    }
}

pub trait RoutineService {
    fn get_routines(&self, page: u32) -> Result<Page<Routine>, ReadError>;
    fn get_all_routines(&self) -> Result<Vec<Routine>, ReadError>;
    fn get_routine(&self, id: RoutineID) -> Result<Routine, ReadError>;
    fn get_all_routine_folders(&self) -> Result<Vec<RoutineFolder>, ReadError>;
}

pub trait ExerciseTemplateService {
    fn get_exercise_templates(&self, page: u32) -> Result<Page<ExerciseTemplate>, ReadError>;
    fn get_all_exercise_templates(&self) -> Result<Vec<ExerciseTemplate>, ReadError>;
    /// Walk the pages until `limit` matching templates have been found.
    fn search_exercise_templates(
        &self,
        filter: &ExerciseTemplateFilter,
        limit: usize,
    ) -> Result<Vec<ExerciseTemplate>, ReadError>;
}

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

/// Request pages until the last one has been received.
fn read_all<T>(
    mut read_page: impl FnMut(u32) -> Result<Page<T>, ReadError>,
) -> Result<Vec<T>, ReadError> {
    let mut items = vec![];
    let mut page = 1;

    loop {
        let current = read_page(page)?;
        let is_last = current.is_last() || current.items.is_empty();
        items.extend(current.items);
        if is_last {
            return Ok(items);
        }
        page += 1;
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    fn get_workouts(&self, page: u32) -> Result<Page<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(page, PAGE_SIZE),
            ReadError,
            "get",
            "workouts"
        )
    }

    fn get_all_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        let workouts = read_all(|page| self.get_workouts(page))?;
        debug!("fetched {} workouts", workouts.len());
        Ok(workouts)
    }

    fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "create",
            "workout"
        )
    }
}

impl<R: RoutineRepository> RoutineService for Service<R> {
    fn get_routines(&self, page: u32) -> Result<Page<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(page, PAGE_SIZE),
            ReadError,
            "get",
            "routines"
        )
    }

    fn get_all_routines(&self) -> Result<Vec<Routine>, ReadError> {
        read_all(|page| self.get_routines(page))
    }

    fn get_routine(&self, id: RoutineID) -> Result<Routine, ReadError> {
        log_on_error!(
            self.repository.read_routine(id),
            ReadError,
            "get",
            "routine"
        )
    }

    fn get_all_routine_folders(&self) -> Result<Vec<RoutineFolder>, ReadError> {
        read_all(|page| {
            log_on_error!(
                self.repository.read_routine_folders(page, PAGE_SIZE),
                ReadError,
                "get",
                "routine folders"
            )
        })
    }
}

impl<R: ExerciseTemplateRepository> ExerciseTemplateService for Service<R> {
    fn get_exercise_templates(&self, page: u32) -> Result<Page<ExerciseTemplate>, ReadError> {
        log_on_error!(
            self.repository.read_exercise_templates(page, PAGE_SIZE),
            ReadError,
            "get",
            "exercise templates"
        )
    }

    fn get_all_exercise_templates(&self) -> Result<Vec<ExerciseTemplate>, ReadError> {
        read_all(|page| self.get_exercise_templates(page))
    }

    fn search_exercise_templates(
        &self,
        filter: &ExerciseTemplateFilter,
        limit: usize,
    ) -> Result<Vec<ExerciseTemplate>, ReadError> {
        let mut found = vec![];
        let mut page = 1;

        while found.len() < limit {
            let current = self.get_exercise_templates(page)?;
            let is_last = current.is_last() || current.items.is_empty();
            found.extend(current.items.into_iter().filter(|t| filter.matches(t)));
            if is_last {
                break;
            }
            page += 1;
        }

        found.truncate(limit);
        debug!("found {} exercise templates in {page} pages", found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use crate::workout::tests::{at, exercise, set, workout};
    use crate::{Metric, StorageError};

    use super::*;

    struct FakeRepository {
        workouts: Vec<Workout>,
        requested_pages: RefCell<Vec<(u32, u32)>>,
        created: RefCell<Vec<NewWorkout>>,
        offline: bool,
    }

    impl FakeRepository {
        fn new(workouts: Vec<Workout>) -> Self {
            Self {
                workouts,
                requested_pages: RefCell::new(vec![]),
                created: RefCell::new(vec![]),
                offline: false,
            }
        }
    }

    impl WorkoutRepository for FakeRepository {
        fn read_workouts(&self, page: u32, page_size: u32) -> Result<Page<Workout>, ReadError> {
            if self.offline {
                return Err(StorageError::NoConnection.into());
            }
            self.requested_pages.borrow_mut().push((page, page_size));
            let chunks = self
                .workouts
                .chunks(page_size as usize)
                .map(<[Workout]>::to_vec)
                .collect::<Vec<_>>();
            Ok(Page {
                page,
                page_count: u32::try_from(chunks.len()).unwrap(),
                items: chunks
                    .get(page as usize - 1)
                    .cloned()
                    .unwrap_or_default(),
            })
        }

        fn read_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
            self.workouts
                .iter()
                .find(|w| w.id == id)
                .cloned()
                .ok_or(ReadError::NotFound)
        }

        fn create_workout(&self, new_workout: NewWorkout) -> Result<Workout, CreateError> {
            self.created.borrow_mut().push(new_workout.clone());
            Ok(Workout {
                id: 99.into(),
                title: new_workout.title,
                description: new_workout.description,
                start_time: new_workout.start_time,
                end_time: new_workout.end_time,
                exercises: vec![],
            })
        }
    }

    impl RoutineRepository for FakeRepository {
        fn read_routines(&self, page: u32, _: u32) -> Result<Page<Routine>, ReadError> {
            Ok(Page {
                page,
                page_count: 0,
                items: vec![],
            })
        }

        fn read_routine(&self, _: RoutineID) -> Result<Routine, ReadError> {
            Err(ReadError::NotFound)
        }

        fn read_routine_folders(
            &self,
            page: u32,
            _: u32,
        ) -> Result<Page<RoutineFolder>, ReadError> {
            Ok(Page {
                page,
                page_count: 2,
                items: vec![RoutineFolder {
                    id: u64::from(page).into(),
                    title: format!("Folder {page}"),
                    index: page - 1,
                }],
            })
        }
    }

    impl ExerciseTemplateRepository for FakeRepository {
        fn read_exercise_templates(
            &self,
            page: u32,
            page_size: u32,
        ) -> Result<Page<ExerciseTemplate>, ReadError> {
            self.requested_pages.borrow_mut().push((page, page_size));
            Ok(Page {
                page,
                page_count: 3,
                items: ["Curl", "Press"]
                    .into_iter()
                    .map(|title| {
                        ExerciseTemplate::reference(
                            format!("{title}{page}").into(),
                            &format!("{title} {page}"),
                        )
                    })
                    .collect(),
            })
        }
    }

    fn workouts(count: u128) -> Vec<Workout> {
        (1..=count)
            .map(|i| {
                workout(
                    i,
                    &format!("2024-01-{i:02}"),
                    vec![exercise("Bench Press", vec![set(Some(50.0 + i as f64), Some(5))])],
                )
            })
            .collect()
    }

    #[test]
    fn test_get_all_workouts_walks_all_pages() {
        let service = Service::new(FakeRepository::new(workouts(23)));

        let all = service.get_all_workouts().unwrap();

        assert_eq!(all.len(), 23);
        assert_eq!(all[22].id, 23.into());
        assert_eq!(
            *service.repository.requested_pages.borrow(),
            vec![(1, 10), (2, 10), (3, 10)]
        );
    }

    #[test]
    fn test_get_all_workouts_without_workouts() {
        let service = Service::new(FakeRepository::new(vec![]));

        assert_eq!(service.get_all_workouts().unwrap(), vec![]);
        assert_eq!(*service.repository.requested_pages.borrow(), vec![(1, 10)]);
    }

    #[test]
    fn test_get_all_workouts_propagates_error() {
        let mut repository = FakeRepository::new(workouts(3));
        repository.offline = true;
        let service = Service::new(repository);

        assert!(matches!(
            service.get_all_workouts(),
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
    }

    #[test]
    fn test_get_workout() {
        let service = Service::new(FakeRepository::new(workouts(3)));

        assert_eq!(service.get_workout(2.into()).unwrap().id, 2.into());
        assert!(matches!(
            service.get_workout(4.into()),
            Err(ReadError::NotFound)
        ));
    }

    #[test]
    fn test_create_workout() {
        let service = Service::new(FakeRepository::new(vec![]));
        let new_workout = NewWorkout {
            title: String::from("Evening"),
            description: None,
            start_time: at("2024-05-01", "18:00:00"),
            end_time: at("2024-05-01", "19:00:00"),
            is_private: false,
            exercises: vec![],
        };

        let created = service.create_workout(new_workout.clone()).unwrap();

        assert_eq!(created.title, "Evening");
        assert_eq!(*service.repository.created.borrow(), vec![new_workout]);
    }

    #[test]
    fn test_get_progress_uses_all_workouts() {
        let service = Service::new(FakeRepository::new(workouts(12)));

        let progress = service
            .get_progress(&ProgressQuery {
                exercise: String::from("bench"),
                metric: Metric::Weight,
                range: DateRange::new(at("2023-12-31", "00:00:00"), at("2024-02-01", "00:00:00")),
            })
            .unwrap();

        assert_eq!(progress.points.len(), 12);
        assert_eq!(progress.analysis.current_value, 62.0);
    }

    #[test]
    fn test_get_personal_records() {
        let service = Service::new(FakeRepository::new(workouts(12)));

        let records = service
            .get_personal_records(&RecordsQuery {
                exercise: None,
                limit: 1,
            })
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].workout_id, 12.into());
    }

    #[test]
    fn test_get_summary() {
        let service = Service::new(FakeRepository::new(workouts(12)));

        let summary = service
            .get_summary(&DateRange::new(
                at("2024-01-05", "00:00:00"),
                at("2024-01-07", "23:00:00"),
            ))
            .unwrap();

        assert_eq!(summary.workouts.total, 3);
        assert_eq!(summary.consistency.current_streak_days, 3);
    }

    #[test]
    fn test_get_routines() {
        let service = Service::new(FakeRepository::new(vec![]));

        assert!(service.get_routines(1).unwrap().items.is_empty());
        assert!(matches!(
            service.get_routine(1.into()),
            Err(ReadError::NotFound)
        ));
    }

    #[test]
    fn test_get_all_routines_without_routines() {
        let service = Service::new(FakeRepository::new(vec![]));

        assert!(service.get_all_routines().unwrap().is_empty());
    }

    #[test]
    fn test_get_all_exercise_templates() {
        let service = Service::new(FakeRepository::new(vec![]));

        assert_eq!(service.get_all_exercise_templates().unwrap().len(), 6);
    }

    #[test]
    fn test_search_exercise_templates_stops_at_limit() {
        let service = Service::new(FakeRepository::new(vec![]));
        let filter = ExerciseTemplateFilter {
            query: String::from("press"),
            ..ExerciseTemplateFilter::default()
        };

        assert_eq!(
            service
                .search_exercise_templates(&filter, 2)
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect::<Vec<_>>(),
            vec!["Press 1", "Press 2"]
        );
        assert_eq!(
            *service.repository.requested_pages.borrow(),
            vec![(1, PAGE_SIZE), (2, PAGE_SIZE)]
        );
    }

    #[test]
    fn test_search_exercise_templates_walks_all_pages() {
        let service = Service::new(FakeRepository::new(vec![]));
        let filter = ExerciseTemplateFilter {
            query: String::from("curl"),
            ..ExerciseTemplateFilter::default()
        };

        assert_eq!(service.search_exercise_templates(&filter, 20).unwrap().len(), 3);
        assert_eq!(service.repository.requested_pages.borrow().len(), 3);
    }

    #[test]
    fn test_get_all_routine_folders() {
        let service = Service::new(FakeRepository::new(vec![]));

        assert_eq!(
            service
                .get_all_routine_folders()
                .unwrap()
                .into_iter()
                .map(|f| f.title)
                .collect::<Vec<_>>(),
            vec!["Folder 1", "Folder 2"]
        );
    }
}
