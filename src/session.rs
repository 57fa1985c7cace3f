use crate::attempt::Direction;
use crate::content::{option_index, option_key};
use crate::models::{AppState, ExerciseKind, LessonSession};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

pub fn handle_attempt_input(session: &mut LessonSession, key: KeyEvent, app_state: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            *app_state = AppState::AttemptQuitConfirm;
            return;
        }
        KeyCode::Char('e') if ctrl => {
            session.attempt.toggle_explanation();
            return;
        }
        KeyCode::Char('f') if ctrl => {
            if session.attempt.finish_early() {
                *app_state = AppState::Summary;
            }
            return;
        }
        KeyCode::Up => {
            navigate(session, Direction::Previous, app_state);
            return;
        }
        KeyCode::Down | KeyCode::Enter => {
            navigate(session, Direction::Next, app_state);
            return;
        }
        // Other Ctrl chords are not answers.
        KeyCode::Char(_) if ctrl => return,
        _ => {}
    }

    let Some(exercise) = session.attempt.current_exercise() else {
        return;
    };
    let exercise_id = exercise.id.clone();

    match exercise.kind() {
        ExerciseKind::MultipleChoice => {
            let option_count = exercise.choice_options().len();
            handle_choice_key(session, &exercise_id, option_count, key);
        }
        ExerciseKind::Flashcard => {
            let card_count = exercise.flashcards().len();
            handle_flashcard_key(session, &exercise_id, card_count, key);
        }
        ExerciseKind::FreeText => handle_text_key(session, &exercise_id, key),
    }
}

fn navigate(session: &mut LessonSession, direction: Direction, app_state: &mut AppState) {
    if !session.attempt.navigate(direction) {
        return;
    }
    if session.attempt.is_finished() {
        *app_state = AppState::Summary;
    } else {
        session.sync_inputs();
    }
}

fn handle_choice_key(session: &mut LessonSession, exercise_id: &str, option_count: usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left => {
            session.selected_option = session.selected_option.saturating_sub(1);
        }
        KeyCode::Right => {
            if session.selected_option + 1 < option_count {
                session.selected_option += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(choice) = option_key(session.selected_option) {
                session.attempt.submit_answer(exercise_id, &choice);
            }
        }
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let choice = c.to_ascii_uppercase().to_string();
            if session.attempt.submit_answer(exercise_id, &choice)
                && let Some(index) = option_index(&choice)
            {
                session.selected_option = index;
            }
        }
        _ => {}
    }
}

fn handle_flashcard_key(session: &mut LessonSession, exercise_id: &str, card_count: usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left => {
            session.selected_card = session.selected_card.saturating_sub(1);
        }
        KeyCode::Right => {
            if session.selected_card + 1 < card_count {
                session.selected_card += 1;
            }
        }
        KeyCode::Char(' ') => {
            session.attempt.flip_card(exercise_id, session.selected_card);
        }
        KeyCode::Char('s') => {
            session.attempt.mark_studied(exercise_id);
        }
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let index = (c as u8 - b'1') as usize;
            if session.attempt.flip_card(exercise_id, index) {
                session.selected_card = index;
            }
        }
        _ => {}
    }
}

fn handle_text_key(session: &mut LessonSession, exercise_id: &str, key: KeyEvent) {
    let char_count = session.input_buffer.chars().count();
    // Keep the cursor inside the buffer before editing
    session.cursor_position = session.cursor_position.min(char_count);

    match key.code {
        KeyCode::Left => {
            session.cursor_position = session.cursor_position.saturating_sub(1);
            return;
        }
        KeyCode::Right => {
            if session.cursor_position < char_count {
                session.cursor_position += 1;
            }
            return;
        }
        KeyCode::Home => {
            session.cursor_position = 0;
            return;
        }
        KeyCode::End => {
            session.cursor_position = char_count;
            return;
        }
        KeyCode::Backspace => {
            if session.cursor_position == 0 {
                return;
            }
            let at = byte_offset(&session.input_buffer, session.cursor_position - 1);
            session.input_buffer.remove(at);
            session.cursor_position -= 1;
        }
        KeyCode::Delete => {
            if session.cursor_position >= char_count {
                return;
            }
            let at = byte_offset(&session.input_buffer, session.cursor_position);
            session.input_buffer.remove(at);
        }
        KeyCode::Char(c) => {
            let at = byte_offset(&session.input_buffer, session.cursor_position);
            session.input_buffer.insert(at, c);
            session.cursor_position += 1;
        }
        _ => return,
    }

    session.attempt.submit_answer(exercise_id, &session.input_buffer);
}
