use crate::grading::AttemptResult;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub id: i64,
    pub lesson_name: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub exercises_total: usize,
    pub score: Option<u8>,
    pub earned_points: Option<u32>,
    pub total_points: Option<u32>,
    pub elapsed_seconds: Option<u64>,
}

const SELECT_ATTEMPT: &str = "SELECT id, lesson_name, started_at, completed_at, exercises_total, score,
        earned_points, total_points, elapsed_seconds
     FROM attempts";

fn attempt_from_row(row: &Row<'_>) -> Result<AttemptRecord> {
    Ok(AttemptRecord {
        id: row.get(0)?,
        lesson_name: row.get(1)?,
        started_at: row.get(2)?,
        completed_at: row.get(3)?,
        exercises_total: row.get(4)?,
        score: row.get(5)?,
        earned_points: row.get(6)?,
        total_points: row.get(7)?,
        elapsed_seconds: row.get(8)?,
    })
}

pub fn create_attempt(
    conn: &Connection,
    lesson_name: &str,
    exercises_total: usize,
    started_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO attempts (lesson_name, started_at, exercises_total) VALUES (?, ?, ?)",
        rusqlite::params![lesson_name, started_at.timestamp(), exercises_total],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn complete_attempt(
    conn: &Connection,
    attempt_id: i64,
    result: &AttemptResult,
    completed_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "UPDATE attempts
         SET completed_at = ?, score = ?, earned_points = ?, total_points = ?, elapsed_seconds = ?
         WHERE id = ?",
        rusqlite::params![
            completed_at.timestamp(),
            result.score,
            result.earned_points,
            result.total_points,
            result.elapsed_seconds,
            attempt_id
        ],
    )?;
    Ok(())
}

pub fn get_attempt(conn: &Connection, attempt_id: i64) -> Result<Option<AttemptRecord>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?", SELECT_ATTEMPT))?;

    match stmt.query_row([attempt_id], attempt_from_row) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Most recent attempts first.
pub fn list_attempts(conn: &Connection, limit: usize) -> Result<Vec<AttemptRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY started_at DESC, id DESC LIMIT ?",
        SELECT_ATTEMPT
    ))?;

    let attempts = stmt
        .query_map([limit], attempt_from_row)?
        .collect::<Result<Vec<_>>>()?;

    Ok(attempts)
}
