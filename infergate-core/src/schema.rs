//! JSON Schemas for structured model output, generated with schemars.

use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;

/// Maximum subject length of a draft, in characters
pub const MAX_SUBJECT_CHARS: usize = 120;
/// Maximum body length of a draft, in characters
pub const MAX_BODY_CHARS: usize = 2000;
/// Number of drafts in a set
pub const DRAFT_COUNT: usize = 3;
/// Maximum number of key points kept in a summary
pub const MAX_KEY_POINTS: usize = 5;

#[allow(dead_code)]
#[derive(Deserialize, JsonSchema)]
struct DraftItem {
    /// Email subject line
    #[schemars(length(min = 1, max = 120))]
    subject: String,
    /// Email body
    #[schemars(length(min = 1, max = 2000))]
    body: String,
}

#[allow(dead_code)]
#[derive(Deserialize, JsonSchema)]
struct DraftEnvelope {
    /// Short, medium and comprehensive reply drafts, in that order
    #[schemars(length(min = 3, max = 3))]
    drafts: Vec<DraftItem>,
}

#[allow(dead_code)]
#[derive(Deserialize, JsonSchema)]
struct SummaryEnvelope {
    /// One or two sentence summary
    tldr: String,
    /// Most important points of the thread
    #[serde(rename = "keyPoints")]
    #[schemars(length(max = 5))]
    key_points: Vec<String>,
}

static DRAFT_SCHEMA: Lazy<serde_json::Value> =
    Lazy::new(|| serde_json::to_value(schema_for!(DraftEnvelope)).unwrap_or_default());

static SUMMARY_SCHEMA: Lazy<serde_json::Value> =
    Lazy::new(|| serde_json::to_value(schema_for!(SummaryEnvelope)).unwrap_or_default());

/// Schema requiring `{ drafts: [exactly 3 x {subject, body}] }`
pub fn draft_schema() -> &'static serde_json::Value {
    &DRAFT_SCHEMA
}

/// Schema requiring `{ tldr, keyPoints }`
pub fn summary_schema() -> &'static serde_json::Value {
    &SUMMARY_SCHEMA
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn resolve<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
        match node.get("$ref").and_then(Value::as_str) {
            Some(reference) => {
                let name = reference.rsplit('/').next().unwrap_or_default();
                &root["$defs"][name]
            }
            None => node,
        }
    }

    fn has_required(node: &Value, field: &str) -> bool {
        node["required"]
            .as_array()
            .map(|r| r.iter().any(|f| f == field))
            .unwrap_or(false)
    }

    #[test]
    fn test_draft_schema_requires_exactly_three() {
        let schema = draft_schema();
        assert!(has_required(schema, "drafts"));

        let drafts = &schema["properties"]["drafts"];
        assert_eq!(drafts["type"], "array");
        assert_eq!(drafts["minItems"], 3);
        assert_eq!(drafts["maxItems"], 3);

        let item = resolve(schema, &drafts["items"]);
        assert!(has_required(item, "subject"));
        assert!(has_required(item, "body"));
        assert_eq!(item["properties"]["subject"]["maxLength"], 120);
        assert_eq!(item["properties"]["body"]["maxLength"], 2000);
    }

    #[test]
    fn test_summary_schema_uses_wire_names() {
        let schema = summary_schema();
        assert!(has_required(schema, "tldr"));
        assert!(has_required(schema, "keyPoints"));
        assert_eq!(schema["properties"]["keyPoints"]["maxItems"], 5);
    }
}
