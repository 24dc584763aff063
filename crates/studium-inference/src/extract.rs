//! Strict extraction of structured study material from normalized JSON text.
//!
//! Where [`crate::normalize`] is forgiving, this module is not: the payload
//! must parse as a JSON array and every element must match the requested
//! schema. Validation is all-or-nothing across the array; a single bad
//! element rejects the whole response so nothing half-validated reaches the
//! datastore. An empty array is a valid zero-item success.

use serde_json::{Map, Value};
use tracing::debug;

use studium_core::{CorrectOption, Error, Flashcard, QuizQuestion, Result};

/// Parse normalized text as a JSON array of objects.
fn parse_array(json_text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| Error::ResponseParse(format!("response is not valid JSON: {}", e)))?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(Error::ResponseSchema(format!(
            "expected a JSON array, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn as_object<'a>(item: &'a Value, index: usize) -> Result<&'a Map<String, Value>> {
    item.as_object().ok_or_else(|| {
        Error::ResponseSchema(format!(
            "element {} is {}, expected an object",
            index,
            json_type_name(item)
        ))
    })
}

/// Fetch a required string field from an element.
fn required_str(obj: &Map<String, Value>, index: usize, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::ResponseSchema(format!(
            "element {}: field `{}` is {}, expected a string",
            index,
            field,
            json_type_name(other)
        ))),
        None => Err(Error::ResponseSchema(format!(
            "element {}: missing required field `{}`",
            index, field
        ))),
    }
}

/// Fetch a required string field that must also be non-empty after trim.
fn required_text(obj: &Map<String, Value>, index: usize, field: &str) -> Result<String> {
    let s = required_str(obj, index, field)?;
    if s.trim().is_empty() {
        return Err(Error::ResponseSchema(format!(
            "element {}: field `{}` is empty",
            index, field
        )));
    }
    Ok(s)
}

/// Fetch an optional string field; `null` and absence both mean none.
fn optional_str(obj: &Map<String, Value>, index: usize, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::ResponseSchema(format!(
            "element {}: field `{}` is {}, expected a string",
            index,
            field,
            json_type_name(other)
        ))),
    }
}

/// Extract a validated flashcard list from normalized JSON text.
///
/// Both `front` and `back` are required and must be non-empty after
/// trimming. An empty array yields `Ok(vec![])`.
pub fn extract_flashcards(json_text: &str) -> Result<Vec<Flashcard>> {
    let items = parse_array(json_text)?;

    let cards = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(item, index)?;
            Ok(Flashcard {
                front: required_text(obj, index, "front")?,
                back: required_text(obj, index, "back")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        subsystem = "inference",
        component = "extractor",
        op = "extract_flashcards",
        item_count = cards.len(),
        "Extracted flashcards from model response"
    );
    Ok(cards)
}

/// Extract a validated quiz question list from normalized JSON text.
///
/// Every question carries its text, four options, and a `correct_option`
/// that must be exactly one of `A`..`D`; `explanation` is optional.
pub fn extract_quiz_questions(json_text: &str) -> Result<Vec<QuizQuestion>> {
    let items = parse_array(json_text)?;

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(item, index)?;
            let correct_raw = required_str(obj, index, "correct_option")?;
            let correct_option = CorrectOption::parse(&correct_raw).ok_or_else(|| {
                Error::ResponseSchema(format!(
                    "element {}: correct_option must be one of A, B, C, D (got `{}`)",
                    index, correct_raw
                ))
            })?;

            Ok(QuizQuestion {
                question_text: required_str(obj, index, "question_text")?,
                option_a: required_str(obj, index, "option_a")?,
                option_b: required_str(obj, index, "option_b")?,
                option_c: required_str(obj, index, "option_c")?,
                option_d: required_str(obj, index, "option_d")?,
                correct_option,
                explanation: optional_str(obj, index, "explanation")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        subsystem = "inference",
        component = "extractor",
        op = "extract_quiz_questions",
        item_count = questions.len(),
        "Extracted quiz questions from model response"
    );
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    // -------------------------------------------------------------------
    // Flashcards
    // -------------------------------------------------------------------

    #[test]
    fn extracts_flashcard_list() {
        let text = r#"[{"front": "What is H2O?", "back": "Water"},
                       {"front": "What is NaCl?", "back": "Table salt"}]"#;
        let cards = extract_flashcards(text).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "What is H2O?");
        assert_eq!(cards[1].back, "Table salt");
    }

    #[test]
    fn empty_array_is_zero_item_success() {
        let cards = extract_flashcards("[]").unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn empty_array_through_normalize_is_success() {
        let cards = extract_flashcards(&normalize("[]")).unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn missing_back_rejects_whole_list() {
        let err = extract_flashcards(r#"[{"front": "Q"}]"#).unwrap_err();
        match err {
            Error::ResponseSchema(msg) => assert!(msg.contains("back")),
            other => panic!("expected ResponseSchema, got {other:?}"),
        }
    }

    #[test]
    fn one_bad_element_rejects_valid_siblings() {
        let text = r#"[{"front": "Q1", "back": "A1"}, {"front": "Q2"}]"#;
        assert!(matches!(
            extract_flashcards(text),
            Err(Error::ResponseSchema(_))
        ));
    }

    #[test]
    fn whitespace_only_side_is_schema_error() {
        let text = r#"[{"front": "Q", "back": "   "}]"#;
        assert!(matches!(
            extract_flashcards(text),
            Err(Error::ResponseSchema(_))
        ));
    }

    #[test]
    fn non_json_is_parse_error() {
        assert!(matches!(
            extract_flashcards("I couldn't help with that."),
            Err(Error::ResponseParse(_))
        ));
    }

    #[test]
    fn non_array_json_is_schema_error() {
        let err = extract_flashcards(r#"{"front": "Q", "back": "A"}"#).unwrap_err();
        match err {
            Error::ResponseSchema(msg) => assert!(msg.contains("array")),
            other => panic!("expected ResponseSchema, got {other:?}"),
        }
    }

    #[test]
    fn non_object_element_is_schema_error() {
        assert!(matches!(
            extract_flashcards(r#"["just a string"]"#),
            Err(Error::ResponseSchema(_))
        ));
    }

    #[test]
    fn round_trips_fenced_flashcards_through_normalize() {
        let cards = vec![
            Flashcard {
                front: "Define entropy".to_string(),
                back: "$S = k_B \\ln \\Omega$".to_string(),
            },
            Flashcard {
                front: "Water synthesis".to_string(),
                back: "\\ce{2H2 + O2 -> 2H2O}".to_string(),
            },
        ];
        let encoded = serde_json::to_string(&cards).unwrap();
        let fenced = format!("```json\n{}\n```", encoded);
        let decoded = extract_flashcards(&normalize(&fenced)).unwrap();
        assert_eq!(decoded, cards);
    }

    #[test]
    fn recovers_unescaped_latex_through_normalize() {
        let raw = r#"[{"front": "Photon energy?", "back": "$E = h\nu$? No: $E = \hbar\omega$"}]"#;
        // `\h` and `\o` are not valid JSON escapes; normalize doubles them.
        let cards = extract_flashcards(&normalize(raw)).unwrap();
        assert_eq!(cards.len(), 1);
        assert!(cards[0].back.contains("\\hbar\\omega"));
    }

    // -------------------------------------------------------------------
    // Quiz questions
    // -------------------------------------------------------------------

    fn quiz_element(correct: &str) -> String {
        format!(
            r#"[{{"question_text": "What is the conjugate base of HCl?",
                 "option_a": "Cl-", "option_b": "H2O", "option_c": "H3O+", "option_d": "OH-",
                 "correct_option": "{}", "explanation": "HCl donates a proton leaving Cl-."}}]"#,
            correct
        )
    }

    #[test]
    fn extracts_quiz_question_list() {
        let questions = extract_quiz_questions(&quiz_element("A")).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_option, CorrectOption::A);
        assert_eq!(questions[0].option_d, "OH-");
        assert!(questions[0].explanation.as_deref().unwrap().contains("proton"));
    }

    #[test]
    fn accepts_every_valid_correct_option() {
        for letter in ["A", "B", "C", "D"] {
            let questions = extract_quiz_questions(&quiz_element(letter)).unwrap();
            assert_eq!(questions[0].correct_option.as_str(), letter);
        }
    }

    #[test]
    fn rejects_out_of_range_correct_option() {
        let err = extract_quiz_questions(&quiz_element("E")).unwrap_err();
        match err {
            Error::ResponseSchema(msg) => assert!(msg.contains("correct_option")),
            other => panic!("expected ResponseSchema, got {other:?}"),
        }
    }

    #[test]
    fn rejects_lowercase_correct_option() {
        assert!(matches!(
            extract_quiz_questions(&quiz_element("a")),
            Err(Error::ResponseSchema(_))
        ));
    }

    #[test]
    fn missing_option_field_is_schema_error() {
        let text = r#"[{"question_text": "Q?", "option_a": "1", "option_b": "2",
                        "option_c": "3", "correct_option": "A"}]"#;
        let err = extract_quiz_questions(text).unwrap_err();
        match err {
            Error::ResponseSchema(msg) => assert!(msg.contains("option_d")),
            other => panic!("expected ResponseSchema, got {other:?}"),
        }
    }

    #[test]
    fn explanation_is_optional_and_null_tolerant() {
        let text = r#"[{"question_text": "Q?", "option_a": "1", "option_b": "2",
                        "option_c": "3", "option_d": "4", "correct_option": "B",
                        "explanation": null}]"#;
        let questions = extract_quiz_questions(text).unwrap();
        assert_eq!(questions[0].explanation, None);
    }

    #[test]
    fn empty_quiz_array_is_success() {
        assert!(extract_quiz_questions("[]").unwrap().is_empty());
    }
}
