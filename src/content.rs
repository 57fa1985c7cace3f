use crate::models::{Exercise, ExerciseContent, ExerciseKind, ExerciseRecord, FlashcardPair, RawOptions};
use serde_json::Value;

pub const NO_QUESTION: &str = "No question";
pub const NO_ANSWER: &str = "No answer";

const DEFAULT_POINTS: u32 = 1;

/// Key for the option at `index`: 0 -> "A", 1 -> "B", ...
pub fn option_key(index: usize) -> Option<String> {
    if index < 26 {
        Some(char::from(b'A' + index as u8).to_string())
    } else {
        None
    }
}

pub fn option_index(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some((c as u8 - b'A') as usize),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn has_field(value: &Value, field: &str) -> bool {
    match value.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// Pairs from a list whose first element carries both sides; `None` otherwise.
fn pairs_from_values(values: &[Value]) -> Option<Vec<FlashcardPair>> {
    let first = values.first()?;
    if !has_field(first, "front") || !has_field(first, "back") {
        return None;
    }

    Some(
        values
            .iter()
            .map(|item| FlashcardPair {
                front: item.get("front").map(value_text).unwrap_or_default(),
                back: item.get("back").map(value_text).unwrap_or_default(),
            })
            .collect(),
    )
}

fn fallback_pair(question: &str, correct_answer: &str) -> FlashcardPair {
    let front = if question.is_empty() { NO_QUESTION } else { question };
    let back = if correct_answer.is_empty() { NO_ANSWER } else { correct_answer };
    FlashcardPair {
        front: front.to_string(),
        back: back.to_string(),
    }
}

/// Resolve the cards of a flashcard exercise. Never fails: anything unusable
/// collapses to a single card built from the prompt and the answer.
pub fn resolve_flashcards(options: &RawOptions, question: &str, correct_answer: &str) -> Vec<FlashcardPair> {
    let resolved = match options {
        RawOptions::RawText(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => pairs_from_values(&items),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "flashcard options are not valid JSON");
                None
            }
        },
        RawOptions::StructuredPairs(items) => pairs_from_values(items),
        RawOptions::Missing => None,
    };

    resolved.unwrap_or_else(|| vec![fallback_pair(question, correct_answer)])
}

pub fn resolve_choice_options(options: &RawOptions) -> Vec<String> {
    match options {
        RawOptions::RawText(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items.iter().map(value_text).collect(),
            _ => {
                tracing::warn!("multiple-choice options could not be parsed, no options shown");
                Vec::new()
            }
        },
        RawOptions::StructuredPairs(items) => items.iter().map(value_text).collect(),
        RawOptions::Missing => Vec::new(),
    }
}

/// Normalize the stored correct answer of a multiple-choice exercise to an option key.
/// Accepts a letter in any case, or the full text of one of the options.
pub fn normalize_choice_key(correct_answer: &str, options: &[String]) -> Option<String> {
    let trimmed = correct_answer.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    if let Some(index) = option_index(&upper)
        && (options.is_empty() || index < options.len())
    {
        return Some(upper);
    }

    options
        .iter()
        .position(|option| option.trim() == trimmed)
        .and_then(option_key)
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        let question = record.question.unwrap_or_default();
        let correct_answer = record.correct_answer.unwrap_or_default();
        let options = RawOptions::from(record.options);

        let kind = ExerciseKind::from_label(&record.exercise_type).unwrap_or_else(|| {
            tracing::warn!(
                exercise_id = %record.id,
                exercise_type = %record.exercise_type,
                "unknown exercise type, treating as free text"
            );
            ExerciseKind::FreeText
        });

        let content = match kind {
            ExerciseKind::MultipleChoice => {
                let options = resolve_choice_options(&options);
                if options.is_empty() {
                    tracing::warn!(exercise_id = %record.id, "multiple-choice exercise has no options, treating as free text");
                    ExerciseContent::FreeText { correct_answer }
                } else {
                    let correct_key = normalize_choice_key(&correct_answer, &options);
                    if correct_key.is_none() {
                        tracing::warn!(exercise_id = %record.id, "multiple-choice exercise has no usable correct key");
                    }
                    ExerciseContent::MultipleChoice { options, correct_key }
                }
            }
            ExerciseKind::Flashcard => {
                ExerciseContent::Flashcards(resolve_flashcards(&options, &question, &correct_answer))
            }
            ExerciseKind::FreeText => ExerciseContent::FreeText { correct_answer },
        };

        Exercise {
            id: record.id,
            question,
            content,
            points: record.points.unwrap_or(DEFAULT_POINTS),
            order: record.order_index.unwrap_or(0),
            explanation: record.explanation.filter(|text| !text.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(exercise_type: &str, options: Option<Value>) -> ExerciseRecord {
        ExerciseRecord {
            id: "ex-1".to_string(),
            exercise_type: exercise_type.to_string(),
            question: Some("Capital of Spain?".to_string()),
            options,
            correct_answer: Some("Madrid".to_string()),
            points: Some(10),
            order_index: Some(0),
            explanation: None,
        }
    }

    #[test]
    fn test_option_keys_follow_position() {
        assert_eq!(option_key(0), Some("A".to_string()));
        assert_eq!(option_key(2), Some("C".to_string()));
        assert_eq!(option_key(26), None);
        assert_eq!(option_index("B"), Some(1));
        assert_eq!(option_index("b"), None);
        assert_eq!(option_index("AB"), None);
    }

    #[test]
    fn test_malformed_flashcard_text_falls_back_to_prompt() {
        let exercise = Exercise::from(record("Fiszki", Some(json!("not valid json{"))));

        assert_eq!(exercise.kind(), ExerciseKind::Flashcard);
        assert_eq!(
            exercise.flashcards(),
            &[FlashcardPair {
                front: "Capital of Spain?".to_string(),
                back: "Madrid".to_string(),
            }]
        );
    }

    #[test]
    fn test_flashcard_text_with_pairs_is_parsed() {
        let text = r#"[{"front":"perro","back":"dog"},{"front":"gato","back":"cat"}]"#;
        let pairs = resolve_flashcards(&RawOptions::RawText(text.to_string()), "Q", "A");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].front, "gato");
        assert_eq!(pairs[1].back, "cat");
    }

    #[test]
    fn test_flashcard_structured_list_is_used_directly() {
        let items = vec![json!({"front": "uno", "back": "one"})];
        let pairs = resolve_flashcards(&RawOptions::StructuredPairs(items), "Q", "A");

        assert_eq!(pairs, vec![FlashcardPair { front: "uno".to_string(), back: "one".to_string() }]);
    }

    #[test]
    fn test_flashcard_list_without_back_falls_back() {
        let text = r#"[{"front":"perro"}]"#;
        let pairs = resolve_flashcards(&RawOptions::RawText(text.to_string()), "Q", "A");
        assert_eq!(pairs, vec![FlashcardPair { front: "Q".to_string(), back: "A".to_string() }]);

        let pairs = resolve_flashcards(&RawOptions::RawText("[]".to_string()), "Q", "A");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].front, "Q");
    }

    #[test]
    fn test_flashcard_fallback_uses_placeholders() {
        let pairs = resolve_flashcards(&RawOptions::Missing, "", "");
        assert_eq!(pairs[0].front, NO_QUESTION);
        assert_eq!(pairs[0].back, NO_ANSWER);
    }

    #[test]
    fn test_choice_options_from_text_and_list() {
        let from_text = resolve_choice_options(&RawOptions::RawText(r#"["Paris","London"]"#.to_string()));
        assert_eq!(from_text, vec!["Paris", "London"]);

        let from_list = resolve_choice_options(&RawOptions::StructuredPairs(vec![json!("Paris"), json!(3)]));
        assert_eq!(from_list, vec!["Paris", "3"]);

        assert!(resolve_choice_options(&RawOptions::RawText("Paris, London".to_string())).is_empty());
    }

    #[test]
    fn test_correct_key_normalization() {
        let options = vec!["Paris".to_string(), "London".to_string(), "Berlin".to_string()];

        assert_eq!(normalize_choice_key(" b ", &options), Some("B".to_string()));
        assert_eq!(normalize_choice_key("Berlin", &options), Some("C".to_string()));
        assert_eq!(normalize_choice_key("D", &options), None);
        assert_eq!(normalize_choice_key("", &options), None);
    }

    #[test]
    fn test_choice_without_usable_options_degrades_to_free_text() {
        let mut raw = record("multiple_choice", Some(json!("Paris, London")));
        raw.correct_answer = Some("Paris".to_string());

        let exercise = Exercise::from(raw);
        assert_eq!(
            exercise.content,
            ExerciseContent::FreeText {
                correct_answer: "Paris".to_string()
            }
        );
        assert_eq!(Exercise::from(record("abcd", None)).kind(), ExerciseKind::FreeText);
    }

    #[test]
    fn test_unknown_kind_degrades_to_free_text() {
        let exercise = Exercise::from(record("matching", None));
        assert_eq!(exercise.kind(), ExerciseKind::FreeText);
    }

    #[test]
    fn test_missing_points_default_and_blank_explanation_dropped() {
        let mut raw = record("text", None);
        raw.points = None;
        raw.explanation = Some("   ".to_string());

        let exercise = Exercise::from(raw);
        assert_eq!(exercise.points, 1);
        assert!(exercise.explanation.is_none());
    }
}
