use rusqlite::{Connection, Result};
use std::path::Path;

pub mod attempt;
pub mod outcome;

pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(db_path)?;

    run_migrations(&conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lesson_name TEXT NOT NULL,
            started_at INTEGER NOT NULL,
            completed_at INTEGER,
            exercises_total INTEGER NOT NULL,
            score INTEGER,
            earned_points INTEGER,
            total_points INTEGER,
            elapsed_seconds INTEGER
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attempts_lesson ON attempts(lesson_name)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attempt_answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            attempt_id INTEGER NOT NULL,
            exercise_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            answer TEXT,
            correct INTEGER NOT NULL,
            points_earned INTEGER NOT NULL,
            points_possible INTEGER NOT NULL,
            display_order INTEGER NOT NULL,
            FOREIGN KEY (attempt_id) REFERENCES attempts(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attempt_answers_attempt ON attempt_answers(attempt_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_directory_and_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");
        let conn = init_db(&db_path).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(db_path.exists());
        assert!(tables.contains(&"attempts".to_string()));
        assert!(tables.contains(&"attempt_answers".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }
}
