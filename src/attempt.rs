//! Navigation and answer bookkeeping for one pass through a lesson.
//!
//! An [`Attempt`] starts at the first exercise and walks forward or back one
//! exercise at a time. Reaching past the last exercise (or finishing early
//! after reviewing flashcards) grades everything once and moves to
//! [`AttemptState::Finished`]; nothing changes after that.

use crate::clock::{Clock, SystemClock};
use crate::content::option_index;
use crate::grading::{score_attempt, AttemptResult};
use crate::models::{Answer, Exercise, ExerciseContent, ExerciseKind};
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// The lesson has no exercises; there is nothing to navigate.
    Empty,
    Active(usize),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    /// `position` is the zero-based index now shown, or `total` once finished.
    ProgressChanged { position: usize, total: usize },
    Finished(AttemptResult),
}

#[derive(Debug)]
pub struct Attempt {
    exercises: Vec<Exercise>,
    answers: HashMap<String, Answer>,
    state: AttemptState,
    started_at: DateTime<Utc>,
    revealed: HashSet<(String, usize)>,
    face_up: HashSet<(String, usize)>,
    showing_explanation: bool,
    result: Option<AttemptResult>,
    events: Option<Sender<AttemptEvent>>,
    clock: Arc<dyn Clock>,
}

impl Attempt {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self::with_clock(exercises, Arc::new(SystemClock))
    }

    pub fn with_clock(exercises: Vec<Exercise>, clock: Arc<dyn Clock>) -> Self {
        let state = if exercises.is_empty() {
            AttemptState::Empty
        } else {
            AttemptState::Active(0)
        };
        let started_at = clock.now();

        tracing::debug!(exercises = exercises.len(), "attempt started");

        Self {
            exercises,
            answers: HashMap::new(),
            state,
            started_at,
            revealed: HashSet::new(),
            face_up: HashSet::new(),
            showing_explanation: false,
            result: None,
            events: None,
            clock,
        }
    }

    /// Deliver progress and completion events to `events`.
    pub fn with_events(mut self, events: Sender<AttemptEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.state == AttemptState::Finished
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            AttemptState::Active(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current_index().and_then(|index| self.exercises.get(index))
    }

    pub fn answer_for(&self, exercise_id: &str) -> Option<&Answer> {
        self.answers.get(exercise_id)
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.current_exercise().and_then(|exercise| self.answers.get(&exercise.id))
    }

    /// Text to put back into the answer field when an exercise is shown again.
    pub fn restored_input(&self) -> String {
        match self.current_answer() {
            Some(Answer::Text(text)) | Some(Answer::Choice(text)) => text.clone(),
            _ => String::new(),
        }
    }

    pub fn showing_explanation(&self) -> bool {
        self.showing_explanation
    }

    pub fn toggle_explanation(&mut self) {
        if self.current_index().is_some() {
            self.showing_explanation = !self.showing_explanation;
        }
    }

    pub fn is_revealed(&self, exercise_id: &str, card_index: usize) -> bool {
        self.revealed.contains(&(exercise_id.to_string(), card_index))
    }

    /// Whether the card currently shows its back side.
    pub fn is_face_up(&self, exercise_id: &str, card_index: usize) -> bool {
        self.face_up.contains(&(exercise_id.to_string(), card_index))
    }

    pub fn revealed_count(&self, exercise_id: &str) -> usize {
        self.revealed.iter().filter(|(id, _)| id == exercise_id).count()
    }

    fn find_exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.id == exercise_id)
    }

    /// Record the learner's answer. Returns whether anything was stored.
    ///
    /// Free text that is blank clears the stored answer; option keys outside
    /// the exercise's options are ignored.
    pub fn submit_answer(&mut self, exercise_id: &str, value: &str) -> bool {
        if self.current_index().is_none() {
            return false;
        }
        let answer = {
            let Some(exercise) = self.find_exercise(exercise_id) else {
                tracing::debug!(exercise_id, "answer for unknown exercise ignored");
                return false;
            };

            match &exercise.content {
                ExerciseContent::MultipleChoice { options, .. } => match option_index(value) {
                    Some(index) if index < options.len() => Some(Answer::Choice(value.to_string())),
                    _ => {
                        tracing::debug!(exercise_id, key = value, "invalid option key ignored");
                        return false;
                    }
                },
                ExerciseContent::FreeText { .. } if value.trim().is_empty() => None,
                ExerciseContent::FreeText { .. } => Some(Answer::Text(value.to_string())),
                ExerciseContent::Flashcards(_) if self.can_mark_studied(exercise_id) => Some(Answer::Studied),
                ExerciseContent::Flashcards(_) => {
                    tracing::debug!(exercise_id, "flashcards not fully revealed, answer ignored");
                    return false;
                }
            }
        };

        match answer {
            Some(answer) => {
                self.answers.insert(exercise_id.to_string(), answer);
                true
            }
            None => {
                self.answers.remove(exercise_id);
                false
            }
        }
    }

    /// Turn a flashcard over. The first flip marks the card as revealed for good.
    pub fn flip_card(&mut self, exercise_id: &str, card_index: usize) -> bool {
        if self.current_index().is_none() {
            return false;
        }
        let card_count = match self.find_exercise(exercise_id) {
            Some(exercise) if exercise.kind() == ExerciseKind::Flashcard => exercise.flashcards().len(),
            _ => return false,
        };
        if card_index >= card_count {
            return false;
        }

        let key = (exercise_id.to_string(), card_index);
        if !self.face_up.remove(&key) {
            self.face_up.insert(key.clone());
        }
        self.revealed.insert(key);
        true
    }

    pub fn can_mark_studied(&self, exercise_id: &str) -> bool {
        match self.find_exercise(exercise_id) {
            Some(exercise) if exercise.kind() == ExerciseKind::Flashcard => {
                let cards = exercise.flashcards().len();
                cards > 0 && (0..cards).all(|index| self.is_revealed(exercise_id, index))
            }
            _ => false,
        }
    }

    /// Record the studied sentinel once every card has been seen. Does not navigate.
    pub fn mark_studied(&mut self, exercise_id: &str) -> bool {
        if self.current_index().is_none() || !self.can_mark_studied(exercise_id) {
            return false;
        }
        self.answers.insert(exercise_id.to_string(), Answer::Studied);
        true
    }

    pub fn can_advance(&self) -> bool {
        let Some(exercise) = self.current_exercise() else {
            return false;
        };
        if self.answers.contains_key(&exercise.id) {
            return true;
        }
        exercise.kind() == ExerciseKind::Flashcard && self.revealed_count(&exercise.id) > 0
    }

    /// Whether the learner may stop before the end.
    pub fn can_finish_early(&self) -> bool {
        self.current_index().is_some()
            && self
                .exercises
                .iter()
                .any(|exercise| exercise.kind() == ExerciseKind::Flashcard && self.answers.contains_key(&exercise.id))
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Next => self.next(),
            Direction::Previous => self.previous(),
        }
    }

    pub fn next(&mut self) -> bool {
        let Some(index) = self.current_index() else {
            return false;
        };
        if !self.can_advance() {
            return false;
        }

        let total = self.exercises.len();
        if index + 1 < total {
            self.move_to(index + 1);
        } else {
            self.emit(AttemptEvent::ProgressChanged { position: total, total });
            self.finish();
        }
        true
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index() {
            Some(index) if index > 0 => {
                self.move_to(index - 1);
                true
            }
            _ => false,
        }
    }

    pub fn finish_early(&mut self) -> bool {
        if !self.can_finish_early() {
            return false;
        }
        tracing::debug!("attempt finished early");
        self.finish();
        true
    }

    fn move_to(&mut self, index: usize) {
        self.state = AttemptState::Active(index);
        self.showing_explanation = false;
        tracing::debug!(index, "moved to exercise");
        self.emit(AttemptEvent::ProgressChanged {
            position: index,
            total: self.exercises.len(),
        });
    }

    fn finish(&mut self) {
        if self.result.is_some() {
            return;
        }

        let finished_at = self.clock.now();
        let result = score_attempt(&self.exercises, &self.answers, self.started_at, finished_at);
        tracing::info!(
            score = result.score,
            earned = result.earned_points,
            total = result.total_points,
            elapsed_seconds = result.elapsed_seconds,
            "attempt finished"
        );

        self.state = AttemptState::Finished;
        self.showing_explanation = false;
        self.result = Some(result.clone());
        self.emit(AttemptEvent::Finished(result));
    }

    fn emit(&self, event: AttemptEvent) {
        if let Some(ref events) = self.events {
            events.send(event).ok();
        }
    }
}
