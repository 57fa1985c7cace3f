use crate::db::attempt::AttemptRecord;
use crate::grading::ExerciseOutcome;
use crate::models::{Exercise, LessonSession, STUDIED_SENTINEL};
use crate::ui::layout::calculate_summary_chunks;
use crate::ui::menu::format_attempt_date;
use crate::utils::{format_elapsed, truncate_string};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn score_color(score: u8) -> Color {
    match score {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn score_text(score: u8, earned: u32, total: u32, elapsed_seconds: u64) -> Text<'static> {
    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        format!("Score: {}%", score),
        Style::default().fg(score_color(score)).add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(format!("Points: {} / {}", earned, total)));
    text.push_line(Line::from(format!("Time: {}", format_elapsed(elapsed_seconds))));
    text
}

fn outcome_lines(outcomes: &[ExerciseOutcome], exercises: &[Exercise]) -> Text<'static> {
    let mut text = Text::default();

    for (i, outcome) in outcomes.iter().enumerate() {
        let (mark, style) = if outcome.correct {
            ("[✓]", Style::default().fg(Color::Green))
        } else {
            ("[✗]", Style::default().fg(Color::Red))
        };
        let label = exercises
            .iter()
            .find(|exercise| exercise.id == outcome.exercise_id)
            .map(|exercise| exercise.question.as_str())
            .unwrap_or(outcome.exercise_id.as_str());

        text.push_line(Line::from(vec![
            Span::styled(mark, style),
            Span::from(format!(
                " {}. {} ({}/{} pt)",
                i + 1,
                truncate_string(label, 60),
                outcome.points_earned,
                outcome.points_possible
            )),
        ]));

        let answer = match outcome.answer.as_deref() {
            None => "(no answer)".to_string(),
            Some(STUDIED_SENTINEL) => "(studied)".to_string(),
            Some(answer) => truncate_string(answer, 56),
        };
        text.push_line(Line::from(Span::styled(
            format!("    Your answer: {}", answer),
            Style::default().fg(Color::DarkGray),
        )));
    }

    text
}

fn draw_header(f: &mut Frame, area: ratatui::layout::Rect, title: String) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, area: ratatui::layout::Rect, with_retry: bool) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    if with_retry {
        spans.extend([Span::styled("r", key), Span::from(" Retry  ")]);
    }
    spans.extend([
        Span::styled("m", key),
        Span::from(" Main Menu  "),
        Span::styled("Esc", key),
        Span::from(" Back"),
    ]);

    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

pub fn draw_summary(f: &mut Frame, session: &LessonSession) {
    let layout = calculate_summary_chunks(f.area());
    draw_header(f, layout.header_area, format!("Lesson Summary - {}", session.lesson_title));

    let Some(result) = session.attempt.result() else {
        let pending = Paragraph::new("This attempt has not been finished.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(pending, layout.score_area);
        draw_footer(f, layout.footer_area, true);
        return;
    };

    let score = Paragraph::new(score_text(
        result.score,
        result.earned_points,
        result.total_points,
        result.elapsed_seconds,
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let outcomes = Paragraph::new(outcome_lines(&result.outcomes, session.attempt.exercises()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Exercises"));
    f.render_widget(outcomes, layout.outcomes_area);

    draw_footer(f, layout.footer_area, true);
}

pub fn draw_attempt_history(f: &mut Frame, attempt: &AttemptRecord, outcomes: &[ExerciseOutcome]) {
    let layout = calculate_summary_chunks(f.area());
    draw_header(
        f,
        layout.header_area,
        format!("{} - {}", attempt.lesson_name, format_attempt_date(attempt.started_at)),
    );

    let score_content = match attempt.score {
        Some(score) => score_text(
            score,
            attempt.earned_points.unwrap_or(0),
            attempt.total_points.unwrap_or(0),
            attempt.elapsed_seconds.unwrap_or(0),
        ),
        None => Text::from(Span::styled(
            format!("Unfinished ({} exercises)", attempt.exercises_total),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    };
    let score = Paragraph::new(score_content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let list = Paragraph::new(outcome_lines(outcomes, &[]))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Exercises"));
    f.render_widget(list, layout.outcomes_area);

    draw_footer(f, layout.footer_area, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseContent, ExerciseKind};

    fn outcome(id: &str, answer: Option<&str>, correct: bool) -> ExerciseOutcome {
        ExerciseOutcome {
            exercise_id: id.to_string(),
            kind: ExerciseKind::FreeText,
            answer: answer.map(str::to_string),
            correct,
            points_earned: if correct { 5 } else { 0 },
            points_possible: 5,
        }
    }

    #[test]
    fn test_score_text() {
        let text = score_text(67, 2, 3, 187);
        assert_eq!(text.lines[0].to_string(), "Score: 67%");
        assert_eq!(text.lines[1].to_string(), "Points: 2 / 3");
        assert_eq!(text.lines[2].to_string(), "Time: 3m 07s");
    }

    #[test]
    fn test_outcome_lines_use_question_text() {
        let exercises = vec![Exercise {
            id: "q1".to_string(),
            question: "Translate: cat".to_string(),
            content: ExerciseContent::FreeText {
                correct_answer: "gato".to_string(),
            },
            points: 5,
            order: 0,
            explanation: None,
        }];
        let text = outcome_lines(&[outcome("q1", Some("gato"), true)], &exercises);

        assert_eq!(text.lines[0].to_string(), "[✓] 1. Translate: cat (5/5 pt)");
        assert_eq!(text.lines[1].to_string(), "    Your answer: gato");
    }

    #[test]
    fn test_outcome_lines_fall_back_to_ids() {
        let text = outcome_lines(
            &[outcome("q1", None, false), outcome("q2", Some(STUDIED_SENTINEL), true)],
            &[],
        );

        assert_eq!(text.lines[0].to_string(), "[✗] 1. q1 (0/5 pt)");
        assert_eq!(text.lines[1].to_string(), "    Your answer: (no answer)");
        assert_eq!(text.lines[3].to_string(), "    Your answer: (studied)");
    }

    #[test]
    fn test_score_colors() {
        assert_eq!(score_color(100), Color::Green);
        assert_eq!(score_color(50), Color::Yellow);
        assert_eq!(score_color(0), Color::Red);
    }
}
