//! Response validation for structured model output.
//!
//! Model output is untrusted. Both local engines and cloud providers tend to
//! wrap JSON in prose or code fences, so string input is scanned for the
//! first balanced object literal before parsing. Structure is then checked
//! exactly; the only correction ever applied is whitespace trimming.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::{DRAFT_COUNT, MAX_BODY_CHARS, MAX_KEY_POINTS, MAX_SUBJECT_CHARS};
use crate::types::{Draft, DraftSet, Operation, ProcessingOutput, SummaryResult};

/// Model output, either raw text or an already parsed value
#[derive(Debug, Clone)]
pub enum RawOutput {
    Text(String),
    Value(Value),
}

impl From<&str> for RawOutput {
    fn from(s: &str) -> Self {
        RawOutput::Text(s.to_string())
    }
}

impl From<String> for RawOutput {
    fn from(s: String) -> Self {
        RawOutput::Text(s)
    }
}

impl From<Value> for RawOutput {
    fn from(v: Value) -> Self {
        RawOutput::Value(v)
    }
}

/// Locate the first balanced `{...}` in `text`, ignoring braces inside string literals.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

fn into_object(raw: RawOutput) -> Result<Map<String, Value>, ValidationError> {
    let value = match raw {
        RawOutput::Text(text) => {
            let literal = find_json_object(&text).ok_or(ValidationError::NoJsonObject)?;
            serde_json::from_str(literal)?
        }
        RawOutput::Value(value) => value,
    };

    match value {
        Value::Object(map) => Ok(map),
        // A JSON string holding the object, as some envelopes double-encode
        Value::String(text) => into_object(RawOutput::Text(text)),
        _ => Err(ValidationError::NotAnObject),
    }
}

/// Validate a summary: `tldr` string and `keyPoints` string array, truncated to 5.
pub fn validate_summary(raw: impl Into<RawOutput>) -> Result<SummaryResult, ValidationError> {
    let obj = into_object(raw.into())?;

    let tldr = match obj.get("tldr") {
        None => return Err(ValidationError::MissingField("tldr".to_string())),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(ValidationError::wrong_type("tldr", "a string")),
    };

    let points = match obj.get("keyPoints") {
        None => return Err(ValidationError::MissingField("keyPoints".to_string())),
        Some(Value::Array(points)) => points,
        Some(_) => return Err(ValidationError::wrong_type("keyPoints", "an array")),
    };

    let key_points = points
        .iter()
        .take(MAX_KEY_POINTS)
        .enumerate()
        .map(|(i, point)| {
            point
                .as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| ValidationError::wrong_type(format!("keyPoints[{}]", i), "a string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SummaryResult { tldr, key_points })
}

/// Validate drafts: exactly 3 objects with non-empty `subject` and `body`.
pub fn validate_drafts(raw: impl Into<RawOutput>) -> Result<DraftSet, ValidationError> {
    let obj = into_object(raw.into())?;

    let items = match obj.get("drafts") {
        None => return Err(ValidationError::MissingField("drafts".to_string())),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::wrong_type("drafts", "an array")),
    };

    if items.len() != DRAFT_COUNT {
        return Err(ValidationError::DraftCount(items.len()));
    }

    let drafts = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_draft(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    let [short, medium, comprehensive]: [Draft; 3] = drafts
        .try_into()
        .map_err(|rest: Vec<Draft>| ValidationError::DraftCount(rest.len()))?;

    Ok(DraftSet::new(short, medium, comprehensive))
}

/// Validate an image description: trimmed and non-empty.
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyField("description".to_string()));
    }
    Ok(description.to_string())
}

/// Validate output for `operation` into its typed form.
pub fn validate_output(
    operation: Operation,
    raw: impl Into<RawOutput>,
) -> Result<ProcessingOutput, ValidationError> {
    let output = match operation {
        Operation::Summarise => ProcessingOutput::Summary(validate_summary(raw)?),
        Operation::Draft => ProcessingOutput::Drafts(validate_drafts(raw)?),
        Operation::Multimodal => match raw.into() {
            RawOutput::Text(text) | RawOutput::Value(Value::String(text)) => {
                ProcessingOutput::Description(validate_description(&text)?)
            }
            RawOutput::Value(_) => {
                return Err(ValidationError::wrong_type("description", "a string"))
            }
        },
    };
    Ok(output)
}

fn parse_draft(index: usize, item: &Value) -> Result<Draft, ValidationError> {
    let obj = item
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(format!("drafts[{}]", index), "an object"))?;

    Ok(Draft {
        subject: required_text(obj, index, "subject", MAX_SUBJECT_CHARS)?,
        body: required_text(obj, index, "body", MAX_BODY_CHARS)?,
    })
}

fn required_text(
    obj: &Map<String, Value>,
    index: usize,
    field: &str,
    limit: usize,
) -> Result<String, ValidationError> {
    let path = format!("drafts[{}].{}", index, field);
    let text = match obj.get(field) {
        None => return Err(ValidationError::MissingField(path)),
        Some(Value::String(s)) => s.trim(),
        Some(_) => return Err(ValidationError::wrong_type(path, "a string")),
    };

    if text.is_empty() {
        return Err(ValidationError::EmptyField(path));
    }
    if text.chars().count() > limit {
        return Err(ValidationError::TooLong { field: path, limit });
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_drafts() -> Value {
        json!({
            "drafts": [
                {"subject": "Re: Lunch", "body": "Sounds good!"},
                {"subject": "Re: Lunch", "body": "Tuesday works for me, see you at noon."},
                {"subject": "Re: Lunch plans", "body": "Thanks for the invite. Tuesday at noon works."}
            ]
        })
    }

    #[test]
    fn test_find_json_object_skips_prose() {
        let text = "Sure! Here you go:\n```json\n{\"tldr\": \"a {curly} tail\", \"keyPoints\": []}\n```\nAnything else?";
        assert_eq!(
            find_json_object(text),
            Some("{\"tldr\": \"a {curly} tail\", \"keyPoints\": []}")
        );
    }

    #[test]
    fn test_find_json_object_handles_escapes_and_nesting() {
        let text = r#"x {"a": "quote \" and } brace", "b": {"c": 1}} y {"d": 2}"#;
        assert_eq!(
            find_json_object(text),
            Some(r#"{"a": "quote \" and } brace", "b": {"c": 1}}"#)
        );
        assert_eq!(find_json_object("no json here"), None);
        assert_eq!(find_json_object("{ never closed"), None);
    }

    #[test]
    fn test_summary_truncates_key_points_in_order() {
        let raw = json!({
            "tldr": "  Team agreed on launch date. ",
            "keyPoints": ["one", "two", "three", "four", "five", "six", "seven"]
        });
        let summary = validate_summary(raw).unwrap();
        assert_eq!(summary.tldr, "Team agreed on launch date.");
        assert_eq!(summary.key_points, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_summary_missing_key_points_fails() {
        let err = validate_summary(json!({"tldr": "x"})).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField(ref f) if f == "keyPoints"));
    }

    #[test]
    fn test_summary_mistyped_fields_fail() {
        assert!(matches!(
            validate_summary(json!({"tldr": 5, "keyPoints": []})),
            Err(ValidationError::WrongType { .. })
        ));
        assert!(matches!(
            validate_summary(json!({"tldr": "x", "keyPoints": "a, b"})),
            Err(ValidationError::WrongType { .. })
        ));
        assert!(matches!(
            validate_summary(json!({"tldr": "x", "keyPoints": ["a", 2]})),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn test_summary_from_wrapped_text() {
        let raw = "Here is the summary: {\"tldr\": \"ok\", \"keyPoints\": [\" a \"]} thanks";
        let summary = validate_summary(raw).unwrap();
        assert_eq!(summary.key_points, vec!["a"]);
    }

    #[test]
    fn test_drafts_round_trip_with_trimming() {
        let mut raw = three_drafts();
        raw["drafts"][0]["subject"] = json!("  Re: Lunch \n");
        let set = validate_drafts(raw).unwrap();

        let expected = three_drafts();
        for (i, draft) in set.iter().enumerate() {
            assert_eq!(draft.subject, expected["drafts"][i]["subject"]);
            assert_eq!(draft.body, expected["drafts"][i]["body"]);
        }
        assert_eq!(set.short().body, "Sounds good!");
    }

    #[test]
    fn test_drafts_wrong_count_rejected() {
        for n in [0usize, 1, 2, 4, 5] {
            let item = json!({"subject": "s", "body": "b"});
            let raw = json!({"drafts": vec![item; n]});
            assert!(
                matches!(validate_drafts(raw), Err(ValidationError::DraftCount(c)) if c == n),
                "count {}",
                n
            );
        }
    }

    #[test]
    fn test_drafts_field_violations_rejected() {
        let mut missing = three_drafts();
        missing["drafts"][1].as_object_mut().unwrap().remove("body");
        assert!(matches!(
            validate_drafts(missing),
            Err(ValidationError::MissingField(ref f)) if f == "drafts[1].body"
        ));

        let mut blank = three_drafts();
        blank["drafts"][2]["subject"] = json!("   ");
        assert!(matches!(validate_drafts(blank), Err(ValidationError::EmptyField(_))));

        let mut typed = three_drafts();
        typed["drafts"][0]["body"] = json!(["not", "text"]);
        assert!(matches!(validate_drafts(typed), Err(ValidationError::WrongType { .. })));

        let mut long = three_drafts();
        long["drafts"][0]["subject"] = json!("s".repeat(121));
        assert!(matches!(
            validate_drafts(long),
            Err(ValidationError::TooLong { limit: 120, .. })
        ));

        let not_object = json!({"drafts": ["a", "b", "c"]});
        assert!(matches!(validate_drafts(not_object), Err(ValidationError::WrongType { .. })));
    }

    #[test]
    fn test_drafts_from_fenced_text() {
        let text = format!("```json\n{}\n```", three_drafts());
        assert!(validate_drafts(text).is_ok());
    }

    #[test]
    fn test_invalid_json_and_non_object() {
        assert!(matches!(
            validate_drafts("{\"drafts\": [,]}"),
            Err(ValidationError::Json(_))
        ));
        assert!(matches!(validate_drafts(json!([1, 2, 3])), Err(ValidationError::NotAnObject)));
        assert!(matches!(validate_summary("plain words"), Err(ValidationError::NoJsonObject)));
    }

    #[test]
    fn test_validate_output_dispatch() {
        let out = validate_output(Operation::Draft, three_drafts()).unwrap();
        assert!(matches!(out, ProcessingOutput::Drafts(_)));

        let out = validate_output(Operation::Multimodal, json!(" A chart. ")).unwrap();
        assert_eq!(out, ProcessingOutput::Description("A chart.".to_string()));
        assert!(validate_output(Operation::Multimodal, json!({"x": 1})).is_err());
    }

    #[test]
    fn test_description() {
        assert_eq!(validate_description("  A red bicycle. ").unwrap(), "A red bicycle.");
        assert!(validate_description(" \n ").is_err());
    }
}
