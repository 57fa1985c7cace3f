use crate::error::{Error, Result};
use crate::models::{Exercise, ExerciseRecord};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Lesson {
    pub name: String,
    pub title: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LessonDocument {
    Full {
        #[serde(default)]
        title: Option<String>,
        exercises: Vec<ExerciseRecord>,
    },
    Bare(Vec<ExerciseRecord>),
}

pub fn get_lesson_files(lessons_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if lessons_dir.is_dir()
        && let Ok(entries) = fs::read_dir(lessons_dir)
    {
        for entry in entries.flatten() {
            if let Some(ext) = entry.path().extension()
                && ext == "json"
            {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    files
}

pub fn lesson_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_lesson(path: &Path) -> Result<Lesson> {
    let content = fs::read_to_string(path)?;
    let lesson = parse_lesson(&lesson_name(path), &content)?;
    tracing::info!(
        lesson = %lesson.name,
        exercises = lesson.exercises.len(),
        "lesson loaded"
    );
    Ok(lesson)
}

/// Build a lesson from its JSON text, resolving every exercise's content and
/// ordering exercises by their display order.
pub fn parse_lesson(name: &str, content: &str) -> Result<Lesson> {
    let (title, records) = match serde_json::from_str::<LessonDocument>(content)? {
        LessonDocument::Full { title, exercises } => (title, exercises),
        LessonDocument::Bare(exercises) => (None, exercises),
    };

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            return Err(Error::Lesson(format!("duplicate exercise id '{}'", record.id)));
        }
    }

    let mut exercises: Vec<Exercise> = records.into_iter().map(Exercise::from).collect();
    exercises.sort_by_key(|exercise| exercise.order);

    Ok(Lesson {
        name: name.to_string(),
        title: title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| name.to_string()),
        exercises,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseContent, ExerciseKind};

    const SPANISH: &str = r#"{
        "title": "Spanish basics",
        "exercises": [
            {"id": "3", "exercise_type": "Tekst", "question": "Capital of Spain?", "correct_answer": "Madrid", "points": 5, "order_index": 3},
            {"id": "1", "exercise_type": "Wybór wielokrotny", "question": "Capital of France?",
             "options": "[\"Paris\",\"London\",\"Berlin\"]", "correct_answer": "a", "points": 2, "order_index": 1},
            {"id": "2", "exercise_type": "Fiszki", "question": "Animals",
             "options": [{"front": "perro", "back": "dog"}, {"front": "gato", "back": "cat"}], "order_index": 2}
        ]
    }"#;

    #[test]
    fn test_parse_lesson_orders_and_resolves() {
        let lesson = parse_lesson("spanish", SPANISH).unwrap();

        assert_eq!(lesson.title, "Spanish basics");
        let ids: Vec<&str> = lesson.exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        assert_eq!(lesson.exercises[0].kind(), ExerciseKind::MultipleChoice);
        assert_eq!(
            lesson.exercises[0].content,
            ExerciseContent::MultipleChoice {
                options: vec!["Paris".to_string(), "London".to_string(), "Berlin".to_string()],
                correct_key: Some("A".to_string()),
            }
        );
        assert_eq!(lesson.exercises[1].flashcards().len(), 2);
        assert_eq!(lesson.exercises[1].points, 1);
        assert_eq!(lesson.exercises[2].kind(), ExerciseKind::FreeText);
    }

    #[test]
    fn test_parse_bare_exercise_list() {
        let content = r#"[{"id": "a", "exercise_type": "text", "question": "Hola?", "correct_answer": "Hello"}]"#;
        let lesson = parse_lesson("greetings", content).unwrap();

        assert_eq!(lesson.title, "greetings");
        assert_eq!(lesson.exercises.len(), 1);
    }

    #[test]
    fn test_empty_lesson_is_allowed() {
        let lesson = parse_lesson("empty", r#"{"exercises": []}"#).unwrap();
        assert!(lesson.exercises.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"[
            {"id": "a", "exercise_type": "text"},
            {"id": "a", "exercise_type": "text"}
        ]"#;
        assert!(matches!(parse_lesson("dup", content), Err(Error::Lesson(_))));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(parse_lesson("broken", "{ nope"), Err(Error::Json(_))));
    }

    #[test]
    fn test_get_lesson_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = get_lesson_files(dir.path());
        let names: Vec<String> = files.iter().map(|p| lesson_name(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_load_lesson_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spanish.json");
        fs::write(&path, SPANISH).unwrap();

        let lesson = load_lesson(&path).unwrap();
        assert_eq!(lesson.name, "spanish");
        assert_eq!(lesson.exercises.len(), 3);
    }

    #[test]
    fn test_missing_directory_yields_no_files() {
        assert!(get_lesson_files(Path::new("/definitely/not/here")).is_empty());
    }
}
