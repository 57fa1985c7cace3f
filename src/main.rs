use crossbeam_channel::{unbounded, Receiver};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use interactive_exercises::db::attempt::{complete_attempt, create_attempt, list_attempts, AttemptRecord};
use interactive_exercises::db::outcome::{load_outcomes, save_outcomes};
use interactive_exercises::grading::ExerciseOutcome;
use interactive_exercises::{
    db, draw_attempt_history, draw_exercise, draw_menu, draw_quit_confirmation, draw_summary, get_lesson_files,
    handle_attempt_input, load_lesson, logger, AppState, Attempt, AttemptEvent, Config, Exercise, LessonSession,
    Result,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rusqlite::Connection;
use std::io;
use std::path::PathBuf;

const HISTORY_LIMIT: usize = 50;

struct App {
    config: Config,
    conn: Connection,
    state: AppState,
    lesson_files: Vec<PathBuf>,
    selected_file_index: usize,
    attempts: Vec<AttemptRecord>,
    selected_attempt_index: usize,
    focused_panel: usize,
    status: Option<String>,
    session: Option<LessonSession>,
    events: Option<Receiver<AttemptEvent>>,
    history: Option<(AttemptRecord, Vec<ExerciseOutcome>)>,
}

impl App {
    fn new(config: Config, conn: Connection) -> Self {
        let lesson_files = get_lesson_files(&config.lessons_dir);
        let mut app = Self {
            config,
            conn,
            state: AppState::Menu,
            lesson_files,
            selected_file_index: 0,
            attempts: Vec::new(),
            selected_attempt_index: 0,
            focused_panel: 0,
            status: None,
            session: None,
            events: None,
            history: None,
        };
        app.refresh_attempts();
        app
    }

    fn refresh_attempts(&mut self) {
        match list_attempts(&self.conn, HISTORY_LIMIT) {
            Ok(attempts) => self.attempts = attempts,
            Err(e) => tracing::error!(error = %e, "failed to list attempts"),
        }
        self.selected_attempt_index = self
            .selected_attempt_index
            .min(self.attempts.len().saturating_sub(1));
    }

    /// Start a fresh attempt over `exercises` and record it as unfinished.
    fn begin_attempt(&mut self, exercises: Vec<Exercise>, lesson_name: &str, lesson_title: &str) {
        let (tx, rx) = unbounded();
        let attempt = Attempt::new(exercises).with_events(tx);

        let attempt_id = match create_attempt(&self.conn, lesson_name, attempt.len(), attempt.started_at()) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(error = %e, lesson = lesson_name, "failed to record attempt start");
                None
            }
        };

        let mut session = LessonSession::new(attempt, lesson_name, lesson_title);
        session.attempt_id = attempt_id;
        self.session = Some(session);
        self.events = Some(rx);
        self.status = None;
        self.state = AppState::Attempt;
    }

    fn open_selected_lesson(&mut self) {
        let Some(path) = self.lesson_files.get(self.selected_file_index).cloned() else {
            return;
        };

        match load_lesson(&path) {
            Ok(lesson) if lesson.exercises.is_empty() => {
                self.status = Some(format!("Lesson '{}' has no exercises", lesson.name));
            }
            Ok(lesson) => self.begin_attempt(lesson.exercises, &lesson.name, &lesson.title),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load lesson");
                self.status = Some(format!("Could not load {}: {}", path.display(), e));
            }
        }
    }

    fn open_selected_history(&mut self) {
        let Some(record) = self.attempts.get(self.selected_attempt_index).cloned() else {
            return;
        };

        match load_outcomes(&self.conn, record.id) {
            Ok(outcomes) => {
                self.history = Some((record, outcomes));
                self.state = AppState::History;
            }
            Err(e) => {
                tracing::error!(attempt_id = record.id, error = %e, "failed to load outcomes");
                self.status = Some(format!("Could not load attempt: {}", e));
            }
        }
    }

    fn retry(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let exercises = session.attempt.exercises().to_vec();
        self.begin_attempt(exercises, &session.lesson_name, &session.lesson_title);
    }

    fn back_to_menu(&mut self) {
        self.session = None;
        self.events = None;
        self.history = None;
        self.state = AppState::Menu;
        self.refresh_attempts();
    }

    /// Drain attempt events; a finished attempt is written to the database.
    fn process_attempt_events(&mut self) {
        let Some(events) = &self.events else {
            return;
        };
        let pending: Vec<AttemptEvent> = events.try_iter().collect();

        for event in pending {
            match event {
                AttemptEvent::ProgressChanged { position, total } => {
                    tracing::debug!(position, total, "progress changed");
                }
                AttemptEvent::Finished(result) => {
                    let Some(attempt_id) = self.session.as_ref().and_then(|s| s.attempt_id) else {
                        continue;
                    };
                    let saved = complete_attempt(&self.conn, attempt_id, &result, chrono::Utc::now())
                        .and_then(|_| save_outcomes(&mut self.conn, attempt_id, &result.outcomes));
                    if let Err(e) = saved {
                        tracing::error!(attempt_id, error = %e, "failed to save attempt result");
                    }
                    self.refresh_attempts();
                }
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('1') => self.focused_panel = 0,
            KeyCode::Char('2') => self.focused_panel = 1,
            KeyCode::Up => {
                if self.focused_panel == 0 {
                    self.selected_file_index = self.selected_file_index.saturating_sub(1);
                } else {
                    self.selected_attempt_index = self.selected_attempt_index.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if self.focused_panel == 0 {
                    if self.selected_file_index + 1 < self.lesson_files.len() {
                        self.selected_file_index += 1;
                    }
                } else if self.selected_attempt_index + 1 < self.attempts.len() {
                    self.selected_attempt_index += 1;
                }
            }
            KeyCode::Enter => {
                if self.focused_panel == 0 {
                    self.open_selected_lesson();
                } else {
                    self.open_selected_history();
                }
            }
            KeyCode::Char('r') => {
                self.lesson_files = get_lesson_files(&self.config.lessons_dir);
                self.selected_file_index = self.selected_file_index.min(self.lesson_files.len().saturating_sub(1));
            }
            KeyCode::Esc | KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.state {
            AppState::Menu => return self.handle_menu_key(key),
            AppState::Attempt => {
                if let Some(session) = &mut self.session {
                    handle_attempt_input(session, key, &mut self.state);
                }
                self.process_attempt_events();
            }
            AppState::AttemptQuitConfirm => match key.code {
                KeyCode::Char('y') => {
                    tracing::info!("attempt abandoned");
                    self.back_to_menu();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Attempt,
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Char('r') => self.retry(),
                KeyCode::Char('m') | KeyCode::Esc => self.back_to_menu(),
                _ => {}
            },
            AppState::History => {
                if matches!(key.code, KeyCode::Char('m') | KeyCode::Esc) {
                    self.back_to_menu();
                }
            }
        }
        false
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| match app.state {
            AppState::Menu => draw_menu(
                f,
                &app.config.lessons_dir,
                &app.lesson_files,
                app.selected_file_index,
                &app.attempts,
                app.selected_attempt_index,
                app.focused_panel,
                app.status.as_deref(),
            ),
            AppState::Attempt => {
                if let Some(session) = &mut app.session {
                    draw_exercise(f, session);
                }
            }
            AppState::AttemptQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(session) = &app.session {
                    draw_summary(f, session);
                }
            }
            AppState::History => {
                if let Some((record, outcomes)) = &app.history {
                    draw_attempt_history(f, record, outcomes);
                }
            }
        })?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    let _log_guard = logger::init(&config.log_level, &config.log_file);
    tracing::info!(lessons_dir = %config.lessons_dir.display(), "starting");

    std::fs::create_dir_all(&config.data_dir)?;
    let conn = db::init_db(&config.db_path())?;
    let mut app = App::new(config, conn);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}
