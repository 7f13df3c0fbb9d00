//! Evaluator settings forms and the debug-run testcase plumbing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::playground::controls::RenderAs;
use crate::playground::enhanced::{next_id, ConfigMetadata, ConfigValue, EnhancedValue, SelectOption, ValueKind};
use crate::playground::parameter::{display_name, Parameter};
use crate::playground::run::{ChatMessage, ChatRole};

const CHAT_KEY: &str = "chat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluator {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub settings_template: Map<String, Value>,
}

/// One entry of an evaluator's settings template.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsField {
    pub key: String,
    pub label: String,
    pub kind: String,
    pub default: Value,
    pub description: Option<String>,
    pub advanced: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub options: Vec<String>,
}

impl SettingsField {
    fn from_template(key: &str, entry: &Value) -> Option<Self> {
        let kind = entry.get("type")?.as_str()?.to_string();
        let text = |k: &str| entry.get(k).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            key: key.to_string(),
            label: text("label").unwrap_or_else(|| display_name(key)),
            kind,
            default: entry.get("default").cloned().unwrap_or(Value::Null),
            description: text("description"),
            advanced: entry.get("advanced").and_then(Value::as_bool).unwrap_or(false),
            min: entry.get("min").and_then(Value::as_f64),
            max: entry.get("max").and_then(Value::as_f64),
            options: entry
                .get("options")
                .and_then(Value::as_array)
                .map(|o| o.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    pub fn is_hidden(&self) -> bool {
        self.kind == "hidden"
    }

    pub fn render_as(&self) -> RenderAs {
        match self.kind.as_str() {
            "text" | "code" => RenderAs::PromptMessageContent,
            _ => RenderAs::Default,
        }
    }

    /// Editable value for this field, starting from `current` or the default.
    pub fn to_value(&self, current: Option<&Value>) -> EnhancedValue {
        let raw = current.unwrap_or(&self.default);
        let kind = match self.kind.as_str() {
            "number" => ValueKind::Number,
            "boolean" | "bool" => ValueKind::Boolean,
            "object" => ValueKind::Object,
            _ => ValueKind::String,
        };
        let mut metadata = ConfigMetadata::new(kind).titled(self.label.clone());
        metadata.description = self.description.clone();
        metadata.min = self.min;
        metadata.max = self.max;
        if !self.options.is_empty() {
            metadata.options = Some(self.options.iter().map(SelectOption::plain).collect());
        }

        let value = match (kind, raw) {
            (ValueKind::Number, Value::Number(n)) => ConfigValue::Number(n.as_f64().unwrap_or_default()),
            (ValueKind::Boolean, Value::Bool(b)) => ConfigValue::Boolean(*b),
            (ValueKind::Object, Value::Object(map)) => ConfigValue::Object(map.clone()),
            (_, Value::String(s)) => ConfigValue::Text(s.clone()),
            _ => ConfigValue::Null,
        };
        EnhancedValue::new(metadata, value)
    }
}

/// Template entries that declare a `type`, in template order.
pub fn evaluator_fields(evaluator: &Evaluator) -> Vec<SettingsField> {
    evaluator
        .settings_template
        .iter()
        .filter_map(|(key, entry)| SettingsField::from_template(key, entry))
        .collect()
}

/// Visible fields split into (basic, advanced).
pub fn split_advanced(fields: &[SettingsField]) -> (Vec<SettingsField>, Vec<SettingsField>) {
    fields
        .iter()
        .filter(|f| !f.is_hidden())
        .cloned()
        .partition(|f| !f.advanced)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfigPayload {
    pub name: String,
    pub evaluator_key: String,
    pub settings_values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorFormError {
    #[error("This field is required")]
    MissingName,

    #[error("No selected key")]
    NoEvaluatorKey,
}

/// Validate the form and build the create/update payload. Hidden fields that
/// the form never showed are sent with their template default.
pub fn build_config_payload(
    name: &str,
    evaluator: &Evaluator,
    values: Map<String, Value>,
) -> Result<EvaluatorConfigPayload, EvaluatorFormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EvaluatorFormError::MissingName);
    }
    if evaluator.key.is_empty() {
        return Err(EvaluatorFormError::NoEvaluatorKey);
    }

    let mut settings_values = values;
    for field in evaluator_fields(evaluator).into_iter().filter(SettingsField::is_hidden) {
        settings_values.entry(field.key).or_insert(field.default);
    }

    Ok(EvaluatorConfigPayload {
        name: name.to_string(),
        evaluator_key: evaluator.key.clone(),
        settings_values,
    })
}

/// Keep only the testcase columns that feed an input of the variant, and tag
/// the result with a fresh id.
pub fn project_testcase(testcase: &Map<String, Value>, inputs: &[Parameter]) -> Map<String, Value> {
    let mut projected: Map<String, Value> = inputs
        .iter()
        .filter_map(|p| testcase.get(&p.name).map(|v| (p.name.clone(), v.clone())))
        .collect();
    projected.insert("id".to_string(), Value::String(next_id("tc")));
    projected
}

/// For chat variants: the testcase without its `chat` column, and that column
/// as a message history (one empty user message when missing).
pub fn split_chat_testcase(testcase: &Map<String, Value>) -> (Map<String, Value>, Vec<ChatMessage>) {
    let mut rest = testcase.clone();
    let chat = rest.remove(CHAT_KEY);

    let history: Vec<ChatMessage> = chat
        .as_ref()
        .and_then(Value::as_array)
        .map(|messages| messages.iter().map(message_from_json).collect())
        .unwrap_or_default();

    if history.is_empty() {
        return (rest, vec![ChatMessage::new(ChatRole::User, "")]);
    }
    (rest, history)
}

fn message_from_json(value: &Value) -> ChatMessage {
    let role = value
        .get("role")
        .and_then(Value::as_str)
        .and_then(ChatRole::parse)
        .unwrap_or(ChatRole::User);
    let content = value.get("content").and_then(Value::as_str).unwrap_or_default();
    ChatMessage::new(role, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playground::parameter::ParameterType;
    use serde_json::json;

    fn similarity_evaluator() -> Evaluator {
        serde_json::from_value(json!({
            "key": "auto_similarity_match",
            "name": "Similarity Match",
            "description": "Compares output with the reference",
            "settings_template": {
                "similarity_threshold": {
                    "label": "Similarity Threshold",
                    "type": "number",
                    "default": 0.5,
                    "min": 0.0,
                    "max": 1.0
                },
                "note": "free text entries without a type are skipped",
                "correct_answer_key": {
                    "label": "Expected Answer Column",
                    "type": "string",
                    "default": "correct_answer",
                    "advanced": true
                },
                "version": { "type": "hidden", "default": "2" }
            }
        }))
        .unwrap()
    }

    fn input(name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            input: true,
            kind: ParameterType::String,
            default: Value::Null,
            options: vec![],
            choices: None,
            minimum: 0.0,
            maximum: 1.0,
            required: false,
        }
    }

    #[test]
    fn test_fields_filtered_and_split() {
        let fields = evaluator_fields(&similarity_evaluator());
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["similarity_threshold", "correct_answer_key", "version"]);

        let (basic, advanced) = split_advanced(&fields);
        assert_eq!(basic.len(), 1);
        assert_eq!(basic[0].key, "similarity_threshold");
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].label, "Expected Answer Column");
    }

    #[test]
    fn test_field_value_metadata() {
        let fields = evaluator_fields(&similarity_evaluator());
        let threshold = fields[0].to_value(None);
        assert_eq!(threshold.metadata.kind, ValueKind::Number);
        assert_eq!(threshold.metadata.max, Some(1.0));
        assert_eq!(threshold.value, ConfigValue::Number(0.5));

        let column = fields[1].to_value(Some(&json!("answer")));
        assert_eq!(column.value, ConfigValue::Text("answer".into()));
    }

    #[test]
    fn test_build_payload_adds_hidden_defaults() {
        let mut values = Map::new();
        values.insert("similarity_threshold".into(), json!(0.8));
        let payload = build_config_payload(" strict match ", &similarity_evaluator(), values).unwrap();
        assert_eq!(payload.name, "strict match");
        assert_eq!(payload.evaluator_key, "auto_similarity_match");
        assert_eq!(payload.settings_values["similarity_threshold"], json!(0.8));
        assert_eq!(payload.settings_values["version"], json!("2"));
    }

    #[test]
    fn test_build_payload_validation() {
        assert_eq!(
            build_config_payload("", &similarity_evaluator(), Map::new()).unwrap_err(),
            EvaluatorFormError::MissingName
        );
        let mut keyless = similarity_evaluator();
        keyless.key.clear();
        assert_eq!(
            build_config_payload("x", &keyless, Map::new()).unwrap_err(),
            EvaluatorFormError::NoEvaluatorKey
        );
    }

    #[test]
    fn test_project_testcase() {
        let testcase = json!({ "country": "France", "correct_answer": "Paris", "id": "old" });
        let projected = project_testcase(testcase.as_object().unwrap(), &[input("country"), input("city")]);
        assert_eq!(projected["country"], json!("France"));
        assert!(!projected.contains_key("correct_answer"));
        assert!(!projected.contains_key("city"));
        assert_ne!(projected["id"], json!("old"));
    }

    #[test]
    fn test_split_chat_testcase() {
        let testcase = json!({
            "correct_answer": "Paris",
            "chat": [
                { "role": "system", "content": "Be brief" },
                { "role": "user", "content": "Capital of France?" }
            ]
        });
        let (rest, history) = split_chat_testcase(testcase.as_object().unwrap());
        assert!(!rest.contains_key("chat"));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::System);
        assert_eq!(history[1].content, "Capital of France?");

        let (_, fallback) = split_chat_testcase(&Map::new());
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].content, "");
    }
}
