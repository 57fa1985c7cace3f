use crate::grading::ExerciseOutcome;
use crate::models::ExerciseKind;
use rusqlite::{Connection, Result};

/// Persist the per-exercise outcomes of an attempt in display order.
pub fn save_outcomes(conn: &mut Connection, attempt_id: i64, outcomes: &[ExerciseOutcome]) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO attempt_answers
                (attempt_id, exercise_id, kind, answer, correct, points_earned, points_possible, display_order)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )?;

        for (index, outcome) in outcomes.iter().enumerate() {
            stmt.execute(rusqlite::params![
                attempt_id,
                outcome.exercise_id,
                outcome.kind.as_str(),
                outcome.answer,
                outcome.correct,
                outcome.points_earned,
                outcome.points_possible,
                index
            ])?;
        }
    }
    tx.commit()
}

pub fn load_outcomes(conn: &Connection, attempt_id: i64) -> Result<Vec<ExerciseOutcome>> {
    let mut stmt = conn.prepare(
        "SELECT exercise_id, kind, answer, correct, points_earned, points_possible
         FROM attempt_answers WHERE attempt_id = ? ORDER BY display_order",
    )?;

    let outcomes = stmt
        .query_map([attempt_id], |row| {
            let kind: String = row.get(1)?;
            Ok(ExerciseOutcome {
                exercise_id: row.get(0)?,
                kind: ExerciseKind::from_label(&kind).unwrap_or(ExerciseKind::FreeText),
                answer: row.get(2)?,
                correct: row.get(3)?,
                points_earned: row.get(4)?,
                points_possible: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(outcomes)
}

pub fn get_correct_count(conn: &Connection, attempt_id: i64) -> Result<usize> {
    let count: usize = conn.query_row(
        "SELECT COUNT(*) FROM attempt_answers WHERE attempt_id = ? AND correct = 1",
        [attempt_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
