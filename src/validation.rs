//! Request validation for todo payloads.
//!
//! Both entry points take the raw JSON object from the request body and
//! either return a typed field set ready for the store or a
//! [`ValidationError`] describing every rule that failed. String values are
//! trimmed first and blank strings count as `null`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::store::{NewTodo, TodoChanges};

pub const TITLE_MAX_CHARS: usize = 255;

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    String,
    Max,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, rule: Rule) -> Self {
        let message = match rule {
            Rule::Required => format!("The {field} field is required."),
            Rule::String => format!("The {field} field must be a string."),
            Rule::Max => {
                format!("The {field} field must not be greater than {TITLE_MAX_CHARS} characters.")
            }
            Rule::Boolean => format!("The {field} field must be true or false."),
        };
        Self {
            field,
            rule,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.errors.iter().find(|err| err.field == name)
    }

    /// First message, plus a count of the remaining ones.
    pub fn summary(&self) -> String {
        let Some(first) = self.errors.first() else {
            return "The given data was invalid.".to_string();
        };
        match self.errors.len() - 1 {
            0 => first.message.clone(),
            1 => format!("{} (and 1 more error)", first.message),
            rest => format!("{} (and {rest} more errors)", first.message),
        }
    }

    /// `{"title": ["..."], ...}` keyed by field name.
    pub fn to_field_map(&self) -> Value {
        let mut map = Map::new();
        for err in &self.errors {
            let entry = map
                .entry(err.field.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(messages) = entry {
                messages.push(Value::String(err.message.clone()));
            }
        }
        Value::Object(map)
    }
}

enum Input<'a> {
    Missing,
    Null,
    Text(&'a str),
    Other,
}

fn input<'a>(fields: &'a Map<String, Value>, name: &str) -> Input<'a> {
    match fields.get(name) {
        None => Input::Missing,
        Some(Value::Null) => Input::Null,
        Some(Value::String(text)) => match text.trim() {
            "" => Input::Null,
            trimmed => Input::Text(trimmed),
        },
        Some(_) => Input::Other,
    }
}

fn checked_title(field: &'static str, text: &str) -> Result<String, FieldError> {
    if text.chars().count() > TITLE_MAX_CHARS {
        return Err(FieldError::new(field, Rule::Max));
    }
    Ok(text.to_string())
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn description(fields: &Map<String, Value>) -> Result<Option<Option<String>>, FieldError> {
    match input(fields, DESCRIPTION) {
        Input::Missing => Ok(None),
        Input::Null => Ok(Some(None)),
        Input::Text(text) => Ok(Some(Some(text.to_string()))),
        Input::Other => Err(FieldError::new(DESCRIPTION, Rule::String)),
    }
}

fn completed(fields: &Map<String, Value>) -> Result<Option<bool>, FieldError> {
    match fields.get(COMPLETED) {
        None => Ok(None),
        Some(value) => parse_bool(value)
            .map(Some)
            .ok_or_else(|| FieldError::new(COMPLETED, Rule::Boolean)),
    }
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|err| errors.push(err)).ok()
}

pub fn validate_create(fields: &Map<String, Value>) -> Result<NewTodo, ValidationError> {
    let mut errors = Vec::new();

    let title = match input(fields, TITLE) {
        Input::Missing | Input::Null => Err(FieldError::new(TITLE, Rule::Required)),
        Input::Text(text) => checked_title(TITLE, text),
        Input::Other => Err(FieldError::new(TITLE, Rule::String)),
    };
    let title = collect(title, &mut errors);
    let description = collect(description(fields), &mut errors);
    let completed = collect(completed(fields), &mut errors);

    match (title, description, completed) {
        (Some(title), Some(description), Some(completed)) => Ok(NewTodo {
            title,
            description: description.flatten(),
            completed: completed.unwrap_or(false),
        }),
        _ => Err(ValidationError { errors }),
    }
}

pub fn validate_update(fields: &Map<String, Value>) -> Result<TodoChanges, ValidationError> {
    let mut errors = Vec::new();

    let title = match input(fields, TITLE) {
        Input::Missing => Ok(None),
        Input::Null | Input::Other => Err(FieldError::new(TITLE, Rule::String)),
        Input::Text(text) => checked_title(TITLE, text).map(Some),
    };
    let title = collect(title, &mut errors);
    let description = collect(description(fields), &mut errors);
    let completed = collect(completed(fields), &mut errors);

    match (title, description, completed) {
        (Some(title), Some(description), Some(completed)) => Ok(TodoChanges {
            title,
            description,
            completed,
        }),
        _ => Err(ValidationError { errors }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::{Rule, TITLE_MAX_CHARS, validate_create, validate_update};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn create_defaults_completed_to_false() {
        let todo = validate_create(&object(json!({ "title": "Buy milk" })))
            .expect("payload should validate");

        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, None);
        assert!(!todo.completed);
    }

    #[test]
    fn create_requires_title() {
        let err = validate_create(&object(json!({}))).expect_err("title is required");

        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.field("title").map(|e| e.rule), Some(Rule::Required));
        assert_eq!(err.to_string(), "The title field is required.");
    }

    #[test]
    fn create_treats_blank_title_as_missing() {
        let err = validate_create(&object(json!({ "title": "   " })))
            .expect_err("blank title should fail");

        assert_eq!(err.field("title").map(|e| e.rule), Some(Rule::Required));
    }

    #[test]
    fn create_rejects_long_title() {
        let title = "A".repeat(TITLE_MAX_CHARS + 1);
        let err = validate_create(&object(json!({ "title": title })))
            .expect_err("256 characters should fail");

        assert_eq!(err.field("title").map(|e| e.rule), Some(Rule::Max));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        let todo = validate_create(&object(json!({ "title": title.clone() })))
            .expect("255 two-byte characters should pass");

        assert_eq!(todo.title, title);
    }

    #[test]
    fn create_trims_strings() {
        let todo = validate_create(&object(json!({
            "title": "  Buy milk  ",
            "description": "   ",
        })))
        .expect("payload should validate");

        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, None);
    }

    #[test]
    fn create_reports_every_failing_field() {
        let err = validate_create(&object(json!({
            "title": 42,
            "description": ["x"],
            "completed": "yes",
        })))
        .expect_err("every field is invalid");

        let rules: Vec<_> = err.errors().iter().map(|e| (e.field, e.rule)).collect();
        assert_eq!(
            rules,
            vec![
                ("title", Rule::String),
                ("description", Rule::String),
                ("completed", Rule::Boolean),
            ]
        );
        assert_eq!(
            err.summary(),
            "The title field must be a string. (and 2 more errors)"
        );
        assert_eq!(
            err.to_field_map()["completed"],
            json!(["The completed field must be true or false."])
        );
    }

    #[test]
    fn completed_accepts_numeric_and_string_flags() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
        ] {
            let todo = validate_create(&object(json!({ "title": "t", "completed": raw })))
                .expect("flag should be accepted");
            assert_eq!(todo.completed, expected);
        }
    }

    #[test]
    fn completed_rejects_null_and_other_numbers() {
        for raw in [json!(null), json!(2), json!("true"), json!(1.5)] {
            let err = validate_update(&object(json!({ "completed": raw })))
                .expect_err("flag should be rejected");
            assert_eq!(err.field("completed").map(|e| e.rule), Some(Rule::Boolean));
        }
    }

    #[test]
    fn update_allows_empty_payload() {
        let changes = validate_update(&object(json!({}))).expect("empty update is valid");

        assert!(changes.is_empty());
    }

    #[test]
    fn update_rejects_null_title() {
        let err = validate_update(&object(json!({ "title": null })))
            .expect_err("present null title should fail");

        assert_eq!(err.field("title").map(|e| e.rule), Some(Rule::String));
    }

    #[test]
    fn update_distinguishes_cleared_and_missing_description() {
        let cleared = validate_update(&object(json!({ "description": null })))
            .expect("null description is allowed");
        let untouched = validate_update(&object(json!({ "completed": true })))
            .expect("payload should validate");

        assert_eq!(cleared.description, Some(None));
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.completed, Some(true));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let changes = validate_update(&object(json!({ "id": 99, "priority": "high" })))
            .expect("unknown keys are dropped");

        assert!(changes.is_empty());
    }
}
