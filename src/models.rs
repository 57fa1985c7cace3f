use crate::attempt::Attempt;
use serde::Deserialize;
use serde_json::Value;

/// Stored text for the flashcard "studied" sentinel.
pub const STUDIED_SENTINEL: &str = "__studied__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    MultipleChoice,
    Flashcard,
    FreeText,
}

impl ExerciseKind {
    /// Match a stored `exercise_type` label, including the backend's Polish names.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "multiple_choice" | "multiple-choice" | "multiplechoice" | "multiple choice"
            | "choice" | "abcd" | "quiz" | "test" | "wybór" | "wybor" | "wybór wielokrotny"
            | "wielokrotny wybór" => Some(Self::MultipleChoice),
            "flashcard" | "flashcards" | "fiszki" | "fiszka" => Some(Self::Flashcard),
            "text" | "free_text" | "free-text" | "freetext" | "free text" | "open" | "tekst"
            | "otwarte" | "pytanie otwarte" | "tłumaczenie" | "tlumaczenie" | "translation"
            | "uzupełnij" | "uzupelnij" => Some(Self::FreeText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Flashcard => "flashcard",
            Self::FreeText => "free_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardPair {
    pub front: String,
    pub back: String,
}

/// The loosely typed `options` column as it arrives from storage.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOptions {
    RawText(String),
    StructuredPairs(Vec<Value>),
    Missing,
}

impl From<Option<Value>> for RawOptions {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawOptions::Missing,
            Some(Value::String(text)) => RawOptions::RawText(text),
            Some(Value::Array(items)) => RawOptions::StructuredPairs(items),
            Some(other) => RawOptions::RawText(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseContent {
    MultipleChoice {
        options: Vec<String>,
        correct_key: Option<String>,
    },
    Flashcards(Vec<FlashcardPair>),
    FreeText {
        correct_answer: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub question: String,
    pub content: ExerciseContent,
    pub points: u32,
    pub order: i64,
    pub explanation: Option<String>,
}

impl Exercise {
    pub fn kind(&self) -> ExerciseKind {
        match self.content {
            ExerciseContent::MultipleChoice { .. } => ExerciseKind::MultipleChoice,
            ExerciseContent::Flashcards(_) => ExerciseKind::Flashcard,
            ExerciseContent::FreeText { .. } => ExerciseKind::FreeText,
        }
    }

    pub fn flashcards(&self) -> &[FlashcardPair] {
        match &self.content {
            ExerciseContent::Flashcards(pairs) => pairs,
            _ => &[],
        }
    }

    pub fn choice_options(&self) -> &[String] {
        match &self.content {
            ExerciseContent::MultipleChoice { options, .. } => options,
            _ => &[],
        }
    }
}

/// One exercise row as stored by the lesson author.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub exercise_type: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choice(String),
    Studied,
}

impl Answer {
    pub fn as_text(&self) -> &str {
        match self {
            Answer::Text(text) | Answer::Choice(text) => text,
            Answer::Studied => STUDIED_SENTINEL,
        }
    }
}

/// Terminal-side state for one lesson being played.
#[derive(Debug)]
pub struct LessonSession {
    pub attempt: Attempt,
    pub lesson_name: String,
    pub lesson_title: String,
    pub attempt_id: Option<i64>,
    pub input_buffer: String,
    /// Cursor position in chars, not bytes.
    pub cursor_position: usize,
    pub input_scroll_y: u16,
    pub selected_option: usize,
    pub selected_card: usize,
}

impl LessonSession {
    pub fn new(attempt: Attempt, lesson_name: &str, lesson_title: &str) -> Self {
        let mut session = Self {
            attempt,
            lesson_name: lesson_name.to_string(),
            lesson_title: lesson_title.to_string(),
            attempt_id: None,
            input_buffer: String::new(),
            cursor_position: 0,
            input_scroll_y: 0,
            selected_option: 0,
            selected_card: 0,
        };
        session.sync_inputs();
        session
    }

    /// Reload the widget state from whatever the attempt has stored for the current exercise.
    pub fn sync_inputs(&mut self) {
        self.input_buffer = self.attempt.restored_input();
        self.cursor_position = self.input_buffer.chars().count();
        self.input_scroll_y = 0;
        self.selected_card = 0;
        self.selected_option = match self.attempt.current_answer() {
            Some(Answer::Choice(key)) => crate::content::option_index(key).unwrap_or(0),
            _ => 0,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Menu,
    Attempt,
    AttemptQuitConfirm,
    Summary,
    History,
}
