use crate::models::{Answer, Exercise, ExerciseContent, ExerciseKind};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseOutcome {
    pub exercise_id: String,
    pub kind: ExerciseKind,
    pub answer: Option<String>,
    pub correct: bool,
    pub points_earned: u32,
    pub points_possible: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub total_points: u32,
    pub earned_points: u32,
    /// Percentage in 0..=100.
    pub score: u8,
    pub elapsed_seconds: u64,
    pub outcomes: Vec<ExerciseOutcome>,
}

pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `answer` is correct for `exercise`. Depends on nothing else.
pub fn is_correct(exercise: &Exercise, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (&exercise.content, answer) {
        // Engagement alone counts for flashcards.
        (ExerciseContent::Flashcards(_), _) => true,
        (_, Answer::Studied) => false,
        (ExerciseContent::MultipleChoice { correct_key, .. }, Answer::Choice(key) | Answer::Text(key)) => {
            correct_key.as_deref() == Some(key.as_str())
        }
        (ExerciseContent::FreeText { correct_answer }, Answer::Text(text) | Answer::Choice(text)) => {
            normalize_text(text) == normalize_text(correct_answer)
        }
    }
}

/// round(100 * earned / total), halves rounded up; 0 when there is nothing to earn.
pub fn percentage(earned: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let earned = u64::from(earned.min(total));
    let total = u64::from(total);
    ((200 * earned + total) / (2 * total)) as u8
}

/// Whole seconds between two instants, never negative.
pub fn elapsed_seconds(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> u64 {
    let millis = (finished_at - started_at).num_milliseconds();
    (millis.max(0) / 1000) as u64
}

pub fn grade(exercises: &[Exercise], answers: &HashMap<String, Answer>) -> (Vec<ExerciseOutcome>, u32, u32) {
    let mut total_points = 0u32;
    let mut earned_points = 0u32;

    let outcomes = exercises
        .iter()
        .map(|exercise| {
            let answer = answers.get(&exercise.id);
            let correct = is_correct(exercise, answer);
            let points_earned = if correct { exercise.points } else { 0 };
            total_points = total_points.saturating_add(exercise.points);
            earned_points = earned_points.saturating_add(points_earned);

            ExerciseOutcome {
                exercise_id: exercise.id.clone(),
                kind: exercise.kind(),
                answer: answer.map(|a| a.as_text().to_string()),
                correct,
                points_earned,
                points_possible: exercise.points,
            }
        })
        .collect();

    (outcomes, total_points, earned_points)
}

pub fn score_attempt(
    exercises: &[Exercise],
    answers: &HashMap<String, Answer>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> AttemptResult {
    let (outcomes, total_points, earned_points) = grade(exercises, answers);

    AttemptResult {
        total_points,
        earned_points,
        score: percentage(earned_points, total_points),
        elapsed_seconds: elapsed_seconds(started_at, finished_at),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlashcardPair;
    use chrono::Duration;

    fn choice_exercise() -> Exercise {
        Exercise {
            id: "mc".to_string(),
            question: "Capital of France?".to_string(),
            content: ExerciseContent::MultipleChoice {
                options: vec!["Paris".to_string(), "London".to_string(), "Berlin".to_string()],
                correct_key: Some("A".to_string()),
            },
            points: 1,
            order: 0,
            explanation: None,
        }
    }

    fn text_exercise(id: &str, correct: &str, points: u32) -> Exercise {
        Exercise {
            id: id.to_string(),
            question: "Capital of Spain?".to_string(),
            content: ExerciseContent::FreeText {
                correct_answer: correct.to_string(),
            },
            points,
            order: 0,
            explanation: None,
        }
    }

    #[test]
    fn test_multiple_choice_matches_key() {
        let exercise = choice_exercise();
        assert!(is_correct(&exercise, Some(&Answer::Choice("A".to_string()))));
        assert!(!is_correct(&exercise, Some(&Answer::Choice("B".to_string()))));
        assert!(!is_correct(&exercise, Some(&Answer::Choice("a".to_string()))));
        assert!(!is_correct(&exercise, None));
    }

    #[test]
    fn test_free_text_is_trimmed_and_case_insensitive() {
        let exercise = text_exercise("t", "Madrid", 1);
        assert!(is_correct(&exercise, Some(&Answer::Text(" madrid ".to_string()))));
        assert!(!is_correct(&exercise, Some(&Answer::Text("Madriddd".to_string()))));
        assert!(!is_correct(&exercise, Some(&Answer::Studied)));
    }

    #[test]
    fn test_flashcard_counts_any_answer() {
        let exercise = Exercise {
            id: "f".to_string(),
            question: String::new(),
            content: ExerciseContent::Flashcards(vec![FlashcardPair {
                front: "uno".to_string(),
                back: "one".to_string(),
            }]),
            points: 5,
            order: 0,
            explanation: None,
        };
        assert!(is_correct(&exercise, Some(&Answer::Studied)));
        assert!(!is_correct(&exercise, None));
    }

    #[test]
    fn test_weighted_score() {
        let exercises = vec![
            text_exercise("a", "uno", 10),
            text_exercise("b", "dos", 20),
            text_exercise("c", "tres", 70),
        ];
        let mut answers = HashMap::new();
        answers.insert("a".to_string(), Answer::Text("uno".to_string()));
        answers.insert("b".to_string(), Answer::Text("cuatro".to_string()));
        answers.insert("c".to_string(), Answer::Text("Tres".to_string()));

        let now = Utc::now();
        let result = score_attempt(&exercises, &answers, now, now);
        assert_eq!(result.earned_points, 80);
        assert_eq!(result.total_points, 100);
        assert_eq!(result.score, 80);
        assert!(!result.outcomes[1].correct);
        assert_eq!(result.outcomes[2].points_earned, 70);
    }

    #[test]
    fn test_percentage_rounds_half_up_and_handles_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_all_zero_points_scores_zero() {
        let exercises = vec![text_exercise("a", "uno", 0), text_exercise("b", "dos", 0)];
        let mut answers = HashMap::new();
        answers.insert("a".to_string(), Answer::Text("uno".to_string()));

        let (_, total, earned) = grade(&exercises, &answers);
        assert_eq!(total, 0);
        assert_eq!(earned, 0);
        assert_eq!(percentage(earned, total), 0);
    }

    #[test]
    fn test_elapsed_seconds_floors_and_clamps() {
        let start = Utc::now();
        assert_eq!(elapsed_seconds(start, start + Duration::milliseconds(2999)), 2);
        assert_eq!(elapsed_seconds(start, start + Duration::seconds(90)), 90);
        assert_eq!(elapsed_seconds(start, start - Duration::seconds(5)), 0);
    }
}
