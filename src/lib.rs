pub mod attempt;
pub mod clock;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod grading;
pub mod lesson;
pub mod logger;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use attempt::{Attempt, AttemptEvent, AttemptState, Direction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use grading::{AttemptResult, ExerciseOutcome, is_correct, score_attempt};
pub use lesson::{Lesson, get_lesson_files, load_lesson};
pub use models::{Answer, AppState, Exercise, ExerciseContent, ExerciseKind, FlashcardPair, LessonSession};
pub use session::handle_attempt_input;
pub use ui::{draw_attempt_history, draw_exercise, draw_menu, draw_quit_confirmation, draw_summary};
pub use utils::calculate_wrapped_cursor_position;
