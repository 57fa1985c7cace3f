use unicode_width::UnicodeWidthChar;

mod markdown;

pub use markdown::render_markdown;

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// "42s", "3m 07s", "1h 02m 00s"
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Split text into visual lines the way ratatui's `Wrap { trim: true }` does.
/// Returns (line_text, start_byte, end_byte) for every visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start_idx = 0;

    for (byte_idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((current_line.trim_end().to_string(), line_start_idx, byte_idx));
            current_line = String::new();
            current_width = 0;
            line_start_idx = byte_idx + 1;
            continue;
        }

        let char_width = ch.width().unwrap_or(1);
        if current_width + char_width > max_width && current_width > 0 {
            lines.push((current_line.trim_end().to_string(), line_start_idx, byte_idx));
            current_line = ch.to_string();
            current_width = char_width;
            line_start_idx = byte_idx;
        } else {
            current_line.push(ch);
            current_width += char_width;
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        lines.push((current_line.trim_end().to_string(), line_start_idx, text.len()));
    }

    lines
}

/// Visual (line, column) of a cursor given as a char position in `text`.
pub fn calculate_wrapped_cursor_position(text: &str, cursor_chars: usize, max_width: usize) -> (usize, usize) {
    if text.is_empty() || cursor_chars == 0 {
        return (0, 0);
    }

    let cursor_index = text
        .char_indices()
        .nth(cursor_chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    let wrapped_lines = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start_idx, end_idx)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start_idx && cursor_index <= *end_idx {
            let col = text[*start_idx..cursor_index].chars().count();
            return (line_idx, col);
        }
    }

    match wrapped_lines.last() {
        Some((last_text, _, _)) => (wrapped_lines.len() - 1, last_text.chars().count()),
        None => (0, 0),
    }
}
