pub mod layout;
mod exercise;
mod menu;
mod summary;

pub use exercise::{draw_exercise, draw_quit_confirmation};
pub use layout::{calculate_exercise_chunks, calculate_summary_chunks};
pub use menu::{draw_menu, format_attempt_date};
pub use summary::{draw_attempt_history, draw_summary};
