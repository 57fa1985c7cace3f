use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};

use crate::db::attempt::AttemptRecord;
use crate::lesson::lesson_name;

pub fn format_attempt_date(timestamp: i64) -> String {
    let Some(utc) = chrono::DateTime::from_timestamp(timestamp, 0) else {
        return "unknown date".to_string();
    };
    let datetime = utc.with_timezone(&chrono::Local);

    let today = chrono::Local::now().date_naive();
    let attempt_date = datetime.date_naive();

    if attempt_date == today {
        format!("Today {}", datetime.format("%H:%M"))
    } else if attempt_date == today - chrono::Duration::days(1) {
        format!("Yesterday {}", datetime.format("%H:%M"))
    } else {
        attempt_date.format("%Y-%m-%d").to_string()
    }
}

fn format_attempt_item(attempt: &AttemptRecord) -> String {
    let date = format_attempt_date(attempt.started_at);
    let status = match attempt.score {
        Some(score) => format!("{}%", score),
        None => "unfinished".to_string(),
    };
    format!("{} - {} ({})", date, attempt.lesson_name, status)
}

fn draw_panel_header(area: Rect, title: &str, focused: bool, f: &mut Frame) {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    f.render_widget(Paragraph::new(title).style(style), area);
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn placeholder(text: &'static str) -> ListItem<'static> {
    ListItem::new(text).style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
}

fn highlight(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_menu(
    f: &mut Frame,
    lessons_dir: &Path,
    lesson_files: &[PathBuf],
    selected_file_index: usize,
    attempts: &[AttemptRecord],
    selected_attempt_index: usize,
    focused_panel: usize,
    status: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Interactive Exercises v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let lesson_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[1]);

    let attempt_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[2]);

    draw_panel_header(lesson_chunks[0], "[1] Lessons", focused_panel == 0, f);

    let lesson_items: Vec<ListItem> = if lesson_files.is_empty() {
        vec![placeholder("No lessons found")]
    } else {
        lesson_files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                ListItem::new(lesson_name(path)).style(highlight(i == selected_file_index && focused_panel == 0))
            })
            .collect()
    };

    let lesson_list = List::new(lesson_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(focused_panel == 0))
            .title(lessons_dir.display().to_string()),
    );
    f.render_widget(lesson_list, lesson_chunks[1]);

    draw_panel_header(attempt_chunks[0], "[2] Past Attempts", focused_panel == 1, f);

    let attempt_items: Vec<ListItem> = if attempts.is_empty() {
        vec![placeholder("No past attempts")]
    } else {
        attempts
            .iter()
            .enumerate()
            .map(|(i, attempt)| {
                ListItem::new(format_attempt_item(attempt))
                    .style(highlight(i == selected_attempt_index && focused_panel == 1))
            })
            .collect()
    };

    let attempt_list =
        List::new(attempt_items).block(Block::default().borders(Borders::ALL).border_style(panel_border(focused_panel == 1)));
    f.render_widget(attempt_list, attempt_chunks[1]);

    let footer = match status {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(vec![
            Span::styled("1/2", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::from(" Focus Panel  "),
            Span::styled("↑/↓", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::from(" Navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::from(" Select  "),
            Span::styled("Esc/Ctrl+C", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::from(" Quit"),
        ]),
    };
    let help = Paragraph::new(footer)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: Option<u8>) -> AttemptRecord {
        AttemptRecord {
            id: 1,
            lesson_name: "spanish_basics".to_string(),
            started_at: chrono::Utc::now().timestamp(),
            completed_at: None,
            exercises_total: 4,
            score,
            earned_points: None,
            total_points: None,
            elapsed_seconds: None,
        }
    }

    #[test]
    fn test_format_attempt_date_today() {
        let now = chrono::Utc::now().timestamp();
        assert!(format_attempt_date(now).starts_with("Today "));
    }

    #[test]
    fn test_format_attempt_date_old() {
        // 2024-01-15 12:00:00 UTC
        assert_eq!(format_attempt_date(1_705_320_000), "2024-01-15");
    }

    #[test]
    fn test_format_attempt_item() {
        assert!(format_attempt_item(&record(Some(85))).ends_with("spanish_basics (85%)"));
        assert!(format_attempt_item(&record(None)).ends_with("spanish_basics (unfinished)"));
    }
}
