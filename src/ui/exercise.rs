use crate::content::option_key;
use crate::models::{Answer, Exercise, ExerciseContent, LessonSession};
use crate::ui::layout::calculate_exercise_chunks;
use crate::utils::{calculate_wrapped_cursor_position, render_markdown};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn key_span(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn kind_label(exercise: &Exercise) -> &'static str {
    match exercise.content {
        ExerciseContent::MultipleChoice { .. } => "Multiple choice",
        ExerciseContent::Flashcards(_) => "Flashcards",
        ExerciseContent::FreeText { .. } => "Free text",
    }
}

pub fn draw_exercise(f: &mut Frame, session: &mut LessonSession) {
    let layout = calculate_exercise_chunks(f.area());

    let Some(index) = session.attempt.current_index() else {
        let empty = Paragraph::new("This lesson has no exercises.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(session.lesson_title.as_str()));
        f.render_widget(empty, layout.answer_area);
        return;
    };
    let Some(exercise) = session.attempt.current_exercise().cloned() else {
        return;
    };

    let progress = format!(
        "Exercise {} / {} - {}  [{}, {} pt]",
        index + 1,
        session.attempt.len(),
        session.lesson_title,
        kind_label(&exercise),
        exercise.points
    );
    let header = Paragraph::new(progress)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question = Paragraph::new(Text::from(exercise.question.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    if session.attempt.showing_explanation() {
        let content = match exercise.explanation.as_deref() {
            Some(explanation) if !explanation.trim().is_empty() => Text::from(render_markdown(explanation)),
            _ => Text::from(Span::styled(
                "No explanation for this exercise.",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        };
        let explanation = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Explanation"));
        f.render_widget(explanation, layout.answer_area);
    } else {
        match &exercise.content {
            ExerciseContent::MultipleChoice { options, .. } => {
                let chosen = match session.attempt.current_answer() {
                    Some(Answer::Choice(key)) => Some(key.clone()),
                    _ => None,
                };
                let text = choice_text(options, session.selected_option, chosen.as_deref());
                let answer = Paragraph::new(text)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("Options"));
                f.render_widget(answer, layout.answer_area);
            }
            ExerciseContent::Flashcards(cards) => {
                let mut text = Text::default();
                for (card_index, card) in cards.iter().enumerate() {
                    let selected = card_index == session.selected_card;
                    let face_up = session.attempt.is_face_up(&exercise.id, card_index);
                    let revealed = session.attempt.is_revealed(&exercise.id, card_index);

                    let marker = if revealed { "[x]" } else { "[ ]" };
                    let side = if face_up { card.back.as_str() } else { card.front.as_str() };
                    let style = match (selected, face_up) {
                        (true, _) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        (false, true) => Style::default().fg(Color::Green),
                        (false, false) => Style::default(),
                    };
                    text.push_line(Line::from(Span::styled(
                        format!("{} {}. {}", marker, card_index + 1, side),
                        style,
                    )));
                }

                text.push_line(Line::from(""));
                let studied = matches!(session.attempt.current_answer(), Some(Answer::Studied));
                let status = if studied {
                    Span::styled("Studied", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled(
                        format!(
                            "Seen {} / {} cards",
                            session.attempt.revealed_count(&exercise.id),
                            cards.len()
                        ),
                        Style::default().fg(Color::DarkGray),
                    )
                };
                text.push_line(Line::from(status));

                let answer = Paragraph::new(text)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Flashcards"));
                f.render_widget(answer, layout.answer_area);
            }
            ExerciseContent::FreeText { .. } => {
                let visible_height = layout.answer_area.height.saturating_sub(2) as usize;
                let text_width = layout.answer_area.width.saturating_sub(2) as usize;
                let (cursor_line, cursor_col) =
                    calculate_wrapped_cursor_position(&session.input_buffer, session.cursor_position, text_width);

                let mut scroll = session.input_scroll_y as usize;
                if cursor_line < scroll {
                    scroll = cursor_line;
                } else if visible_height > 0 && cursor_line >= scroll + visible_height {
                    scroll = cursor_line + 1 - visible_height;
                }
                session.input_scroll_y = scroll as u16;

                let content = if session.input_buffer.is_empty() {
                    Text::from(Span::styled(
                        "[Type your answer here...]",
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    Text::from(session.input_buffer.as_str())
                };
                let answer = Paragraph::new(content)
                    .wrap(Wrap { trim: true })
                    .scroll((session.input_scroll_y, 0))
                    .block(Block::default().borders(Borders::ALL).title("Your Answer"));
                f.render_widget(answer, layout.answer_area);

                let cursor_x = layout.answer_area.x + 1 + cursor_col as u16;
                let cursor_y =
                    layout.answer_area.y + 1 + (cursor_line as u16).saturating_sub(session.input_scroll_y);
                f.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }

    let help = Paragraph::new(help_lines(session, &exercise))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn choice_text(options: &[String], selected: usize, chosen: Option<&str>) -> Text<'static> {
    let mut text = Text::default();
    if options.is_empty() {
        text.push_line(Line::from(Span::styled(
            "No options",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
        return text;
    }

    for (index, option) in options.iter().enumerate() {
        let key = option_key(index).unwrap_or_default();
        let is_chosen = chosen == Some(key.as_str());
        let marker = if is_chosen { "(*)" } else { "( )" };
        let style = if index == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if is_chosen {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        text.push_line(Line::from(Span::styled(format!("{} {}. {}", marker, key, option), style)));
    }
    text
}

fn help_lines(session: &LessonSession, exercise: &Exercise) -> Vec<Line<'static>> {
    let mut kind_spans = match exercise.content {
        ExerciseContent::MultipleChoice { .. } => vec![
            key_span("A-Z"),
            Span::from(" Choose  "),
            key_span("←/→"),
            Span::from(" Highlight  "),
            key_span("Space"),
            Span::from(" Pick  "),
        ],
        ExerciseContent::Flashcards(_) => vec![
            key_span("←/→"),
            Span::from(" Card  "),
            key_span("Space/1-9"),
            Span::from(" Flip  "),
            key_span("s"),
            Span::from(" Studied  "),
        ],
        ExerciseContent::FreeText { .. } => vec![key_span("Type"), Span::from(" Answer  ")],
    };

    let next_style = if session.attempt.can_advance() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    kind_spans.extend([
        Span::styled("Enter/↓", next_style),
        Span::from(" Next  "),
        key_span("↑"),
        Span::from(" Previous"),
    ]);

    let mut ctrl_spans = vec![
        key_span("Ctrl+E"),
        Span::from(" Explanation  "),
        key_span("Esc"),
        Span::from(" Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ];
    if session.attempt.can_finish_early() {
        ctrl_spans.extend([Span::from("  "), key_span("Ctrl+F"), Span::from(" Finish")]);
    }

    vec![Line::from(kind_spans), Line::from(ctrl_spans)]
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Length(3)])
        .split(f.area());

    let title = Paragraph::new("Leave Lesson")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Return to the menu? This attempt will not be scored.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::from(" No (Keep Going)  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
