use chrono::{DateTime, Duration, FixedOffset};

use crate::{ExerciseTemplate, Reps, Routine, SetType, Weight, Workout, WorkoutExercise};

const WEIGHT_INPUT_LIMIT: usize = 6;
const REPS_INPUT_LIMIT: usize = 4;

/// Live state of a workout being logged.
///
/// The cursor always points at an existing set as long as the current exercise has
/// sets. All transitions are plain methods, so the session can be driven by a
/// terminal loop as well as by tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    title: String,
    start_time: DateTime<FixedOffset>,
    exercises: Vec<SessionExercise>,
    exercise_idx: usize,
    set_idx: usize,
    field: Field,
    weight_input: String,
    reps_input: String,
    outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub template: ExerciseTemplate,
    pub sets: Vec<SessionSet>,
    pub notes: String,
    pub done: bool,
}

impl SessionExercise {
    #[must_use]
    pub fn new(template: ExerciseTemplate, sets: Vec<SessionSet>, notes: String) -> Self {
        Self {
            template,
            sets,
            notes,
            done: false,
        }
    }

    #[must_use]
    pub fn num_completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.complete).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sets.iter().all(|s| s.complete)
    }

    fn update_done(&mut self) {
        self.done = self.is_complete();
    }
}

impl From<&WorkoutExercise> for SessionExercise {
    fn from(exercise: &WorkoutExercise) -> Self {
        Self::new(
            ExerciseTemplate::reference(exercise.exercise_template_id.clone(), &exercise.title),
            exercise
                .sets
                .iter()
                .map(|s| SessionSet::new(s.set_type))
                .collect(),
            exercise.notes.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionSet {
    pub weight: Weight,
    pub reps: Reps,
    pub set_type: SetType,
    pub complete: bool,
}

impl SessionSet {
    #[must_use]
    pub fn new(set_type: SetType) -> Self {
        Self {
            set_type,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    #[default]
    Weight,
    Reps,
}

impl Field {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Field::Weight => Field::Reps,
            Field::Reps => Field::Weight,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Active,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleField,
    Input(char),
    DeleteChar,
    CommitAndAdvance,
    MoveSet(i32),
    MoveExercise(i32),
    AppendSet,
    Finish,
    Cancel,
}

/// What is left of a session after it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub title: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub exercises: Vec<SessionExercise>,
    pub outcome: Outcome,
}

impl SessionResult {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome == Outcome::Finished
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn num_completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(SessionExercise::num_completed_sets)
            .sum()
    }
}

impl Session {
    #[must_use]
    pub fn new(
        title: String,
        exercises: Vec<SessionExercise>,
        start_time: DateTime<FixedOffset>,
    ) -> Self {
        let mut session = Self {
            title,
            start_time,
            exercises,
            exercise_idx: 0,
            set_idx: 0,
            field: Field::Weight,
            weight_input: String::new(),
            reps_input: String::new(),
            outcome: Outcome::Active,
        };
        session.load_current_set();
        session
    }

    /// Session with a single placeholder exercise of three normal sets.
    #[must_use]
    pub fn blank(start_time: DateTime<FixedOffset>) -> Self {
        Self::new(
            String::from("New Workout"),
            vec![SessionExercise::new(
                ExerciseTemplate::reference(crate::ExerciseTemplateID::default(), "Exercise 1"),
                vec![SessionSet::new(SetType::Normal); 3],
                String::new(),
            )],
            start_time,
        )
    }

    #[must_use]
    pub fn from_routine(routine: &Routine, start_time: DateTime<FixedOffset>) -> Self {
        Self::new(
            routine.title.clone(),
            routine.exercises.iter().map(SessionExercise::from).collect(),
            start_time,
        )
    }

    /// Repeat a previous workout. Only the structure is taken over, not the logged values.
    #[must_use]
    pub fn from_workout(workout: &Workout, start_time: DateTime<FixedOffset>) -> Self {
        Self::new(
            workout.title.clone(),
            workout.exercises.iter().map(SessionExercise::from).collect(),
            start_time,
        )
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    #[must_use]
    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    #[must_use]
    pub fn exercise_idx(&self) -> usize {
        self.exercise_idx
    }

    #[must_use]
    pub fn set_idx(&self) -> usize {
        self.set_idx
    }

    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    #[must_use]
    pub fn weight_input(&self) -> &str {
        &self.weight_input
    }

    #[must_use]
    pub fn reps_input(&self) -> &str {
        &self.reps_input
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.outcome == Outcome::Active
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome == Outcome::Finished
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.outcome == Outcome::Cancelled
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&SessionExercise> {
        self.exercises.get(self.exercise_idx)
    }

    #[must_use]
    pub fn current_set(&self) -> Option<&SessionSet> {
        self.current_exercise()
            .and_then(|exercise| exercise.sets.get(self.set_idx))
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn num_completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(SessionExercise::num_completed_sets)
            .sum()
    }

    #[must_use]
    pub fn num_done_exercises(&self) -> usize {
        self.exercises.iter().filter(|e| e.done).count()
    }

    #[must_use]
    pub fn elapsed(&self, now: DateTime<FixedOffset>) -> Duration {
        now - self.start_time
    }

    /// Apply an action. Actions are ignored once the session has ended.
    pub fn handle(&mut self, action: Action) {
        if !self.is_active() {
            return;
        }

        match action {
            Action::ToggleField => self.toggle_field(),
            Action::Input(c) => {
                self.push_char(c);
            }
            Action::DeleteChar => self.pop_char(),
            Action::CommitAndAdvance => {
                self.commit_set();
                self.advance_after_commit();
            }
            Action::MoveSet(delta) => self.move_set_cursor(delta),
            Action::MoveExercise(delta) => self.move_exercise_cursor(delta),
            Action::AppendSet => self.append_set(),
            Action::Finish => self.finish(),
            Action::Cancel => self.cancel(),
        }
    }

    pub fn select_field(&mut self, field: Field) {
        self.field = field;
    }

    pub fn toggle_field(&mut self) {
        self.field = self.field.other();
    }

    /// Append a character to the focused input. Returns whether the character was accepted.
    pub fn push_char(&mut self, c: char) -> bool {
        let accepted = match self.field {
            Field::Weight => {
                self.weight_input.len() < WEIGHT_INPUT_LIMIT
                    && (c.is_ascii_digit() || (c == '.' && !self.weight_input.contains('.')))
            }
            Field::Reps => self.reps_input.len() < REPS_INPUT_LIMIT && c.is_ascii_digit(),
        };

        if accepted {
            self.focused_input_mut().push(c);
        }

        accepted
    }

    pub fn pop_char(&mut self) {
        self.focused_input_mut().pop();
    }

    /// Store the input buffers in the current set and mark it complete.
    ///
    /// Input that does not represent a valid weight or number of repetitions is
    /// stored as zero.
    pub fn commit_set(&mut self) {
        let weight = Weight::try_from(self.weight_input.as_str()).unwrap_or_default();
        let reps = Reps::try_from(self.reps_input.as_str()).unwrap_or_default();

        let Some(exercise) = self.exercises.get_mut(self.exercise_idx) else {
            return;
        };
        let Some(set) = exercise.sets.get_mut(self.set_idx) else {
            return;
        };

        set.weight = weight;
        set.reps = reps;
        set.complete = true;
        exercise.update_done();
    }

    /// Move on to the next set of the current exercise, or to the first set of the
    /// next exercise if the current one has no further sets.
    pub fn advance_after_commit(&mut self) {
        let Some(exercise) = self.exercises.get_mut(self.exercise_idx) else {
            return;
        };

        exercise.update_done();

        if self.set_idx + 1 < exercise.sets.len() {
            self.set_idx += 1;
            self.load_current_set();
        } else if self.exercise_idx + 1 < self.exercises.len() {
            self.exercise_idx += 1;
            self.set_idx = 0;
            self.load_current_set();
        }
    }

    pub fn move_set_cursor(&mut self, delta: i32) {
        let num_sets = self.current_exercise().map_or(0, |e| e.sets.len());
        let target = clamped_index(self.set_idx, delta, num_sets);

        if target != self.set_idx {
            self.set_idx = target;
            self.load_current_set();
        }
    }

    pub fn move_exercise_cursor(&mut self, delta: i32) {
        let target = clamped_index(self.exercise_idx, delta, self.exercises.len());

        if target != self.exercise_idx {
            self.exercise_idx = target;
            self.set_idx = 0;
            self.load_current_set();
        }
    }

    pub fn append_set(&mut self) {
        let Some(exercise) = self.exercises.get_mut(self.exercise_idx) else {
            return;
        };

        exercise.sets.push(SessionSet::new(SetType::Normal));
        exercise.update_done();
        self.set_idx = exercise.sets.len() - 1;
        self.load_current_set();
    }

    pub fn finish(&mut self) {
        self.outcome = Outcome::Finished;
    }

    pub fn cancel(&mut self) {
        self.outcome = Outcome::Cancelled;
    }

    #[must_use]
    pub fn into_result(self, end_time: DateTime<FixedOffset>) -> SessionResult {
        SessionResult {
            title: self.title,
            start_time: self.start_time,
            end_time,
            exercises: self.exercises,
            outcome: self.outcome,
        }
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.field {
            Field::Weight => &mut self.weight_input,
            Field::Reps => &mut self.reps_input,
        }
    }

    fn load_current_set(&mut self) {
        let (weight_input, reps_input) = match self.current_set() {
            Some(set) if set.complete => (
                format!("{:.1}", f64::from(set.weight)),
                set.reps.to_string(),
            ),
            _ => (String::new(), String::new()),
        };
        self.weight_input = weight_input;
        self.reps_input = reps_input;
        self.field = Field::Weight;
    }
}

fn clamped_index(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return current;
    }
    let target = i64::try_from(current)
        .unwrap_or(i64::MAX)
        .saturating_add(i64::from(delta));
    let last = len - 1;
    usize::try_from(target.max(0)).map_or(last, |t| t.min(last))
}

/// Elapsed time as `MM:SS`, or `HH:MM:SS` from one hour on.
#[must_use]
pub fn format_elapsed(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
