//! OpenAPI schema → parameter descriptors.
//!
//! A variant service publishes an OpenAPI document whose `/generate` request
//! body references one schema under `components.schemas`. Every property of
//! that schema becomes a [`Parameter`]; the custom `x-parameter` tag decides
//! its type and whether it is an input or a tunable option.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Closed set of parameter types understood by the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Integer,
    Array,
    Object,
    GroupedChoice,
    FileUrl,
}

impl ParameterType {
    /// Map an `x-parameter` tag to a type. Missing or unknown tags are strings.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("text") => ParameterType::String,
            Some("choice") => ParameterType::Array,
            Some("grouped_choice") => ParameterType::GroupedChoice,
            Some("float") => ParameterType::Number,
            Some("dict") => ParameterType::Object,
            Some("bool") => ParameterType::Boolean,
            Some("int") => ParameterType::Integer,
            Some("file_url") => ParameterType::FileUrl,
            _ => ParameterType::String,
        }
    }
}

/// One editable field derived from the body schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub input: bool,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(default)]
    pub default: Value,
    #[serde(rename = "enum", default)]
    pub options: Vec<Value>,
    /// Group label → options, only for `grouped_choice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Map<String, Value>>,
    pub minimum: f64,
    pub maximum: f64,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaResolutionError {
    #[error("schema has no JSON body reference for POST /generate")]
    NoBodyReference,

    #[error("body schema '{0}' is not defined under components.schemas")]
    UnknownSchema(String),
}

const CHAT_INPUT_PROPERTY: &str = "inputs";
const INPUT_TAGS: &[&str] = &["messages", "file_url"];

fn body_reference(schema: &Value) -> Option<&str> {
    schema
        .get("paths")?
        .get("/generate")?
        .get("post")?
        .get("requestBody")?
        .get("content")?
        .get("application/json")?
        .get("schema")?
        .get("$ref")?
        .as_str()
}

/// Name of the schema referenced by the `/generate` body, or `""` when the
/// reference cannot be followed.
pub fn body_schema_name(schema: &Value) -> String {
    body_reference(schema)
        .and_then(|r| r.rsplit('/').next())
        .unwrap_or_default()
        .to_string()
}

/// Strict lookup of the body schema object.
pub fn resolve_body_schema(schema: &Value) -> Result<&Map<String, Value>, SchemaResolutionError> {
    let name = body_schema_name(schema);
    if name.is_empty() {
        return Err(SchemaResolutionError::NoBodyReference);
    }
    schema
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.get(&name))
        .and_then(Value::as_object)
        .ok_or(SchemaResolutionError::UnknownSchema(name))
}

/// True when the variant's primary input is a chat message list.
pub fn detect_chat_variant(schema: &Value) -> bool {
    resolve_body_schema(schema)
        .ok()
        .and_then(|body| body.get("properties"))
        .and_then(|props| props.get(CHAT_INPUT_PROPERTY))
        .and_then(|input| input.get("x-parameter"))
        .and_then(Value::as_str)
        == Some("messages")
}

/// Parse every body property into a [`Parameter`], in property order.
///
/// An unresolvable body reference yields an empty list; use
/// [`resolve_body_schema`] to find out why.
pub fn openapi_to_parameters(schema: &Value) -> Vec<Parameter> {
    let Ok(body) = resolve_body_schema(schema) else {
        return Vec::new();
    };

    let required: Vec<&str> = body
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = body.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, property)| parse_property(name, property, &required))
        .collect()
}

fn parse_property(name: &str, property: &Value, required: &[&str]) -> Parameter {
    let tag = property.get("x-parameter").and_then(Value::as_str);
    let kind = ParameterType::from_tag(tag);

    Parameter {
        name: name.to_string(),
        input: tag.map_or(true, |t| INPUT_TAGS.contains(&t)),
        kind,
        default: property.get("default").cloned().unwrap_or(Value::Null),
        options: property
            .get("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        choices: if kind == ParameterType::GroupedChoice {
            property.get("choices").and_then(Value::as_object).cloned()
        } else {
            None
        },
        minimum: property.get("minimum").and_then(Value::as_f64).unwrap_or(0.0),
        maximum: property.get("maximum").and_then(Value::as_f64).unwrap_or(1.0),
        required: required.contains(&name),
    }
}

/// Partition into (inputs, options), keeping order within each side.
pub fn split_parameters(parameters: Vec<Parameter>) -> (Vec<Parameter>, Vec<Parameter>) {
    parameters.into_iter().partition(|p| p.input)
}

/// `max_tokens` → `Max tokens`, used for labels and placeholders.
pub fn display_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_with_body(body: Value) -> Value {
        json!({
            "paths": {
                "/generate": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Body" }
                                }
                            }
                        }
                    }
                }
            },
            "components": { "schemas": { "Body": body } }
        })
    }

    #[test]
    fn test_body_scenario() {
        let schema = schema_with_body(json!({
            "properties": {
                "prompt": { "x-parameter": "text" },
                "temperature": { "x-parameter": "float", "minimum": 0, "maximum": 2 }
            },
            "required": ["prompt"]
        }));

        let params = openapi_to_parameters(&schema);
        assert_eq!(params.len(), 2);

        assert_eq!(params[0].name, "prompt");
        assert_eq!(params[0].kind, ParameterType::String);
        assert!(params[0].required);
        // "text" is a tagged option, not one of the input tags
        assert!(!params[0].input);

        assert_eq!(params[1].name, "temperature");
        assert_eq!(params[1].kind, ParameterType::Number);
        assert!(!params[1].input);
        assert_eq!(params[1].minimum, 0.0);
        assert_eq!(params[1].maximum, 2.0);
        assert!(!params[1].required);
    }

    #[test]
    fn test_property_order_preserved() {
        let schema = schema_with_body(json!({
            "properties": {
                "zeta": {}, "alpha": {}, "mid": {}, "beta": {}
            }
        }));
        let names: Vec<String> = openapi_to_parameters(&schema)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "beta"]);
    }

    #[test]
    fn test_untagged_property_is_string_input() {
        let schema = schema_with_body(json!({ "properties": { "country": {} } }));
        let params = openapi_to_parameters(&schema);
        assert_eq!(params[0].kind, ParameterType::String);
        assert!(params[0].input);
        assert!(params[0].options.is_empty());
        assert_eq!(params[0].minimum, 0.0);
        assert_eq!(params[0].maximum, 1.0);
        assert_eq!(params[0].default, Value::Null);
    }

    #[test]
    fn test_input_tags() {
        let schema = schema_with_body(json!({
            "properties": {
                "inputs": { "x-parameter": "messages" },
                "document": { "x-parameter": "file_url" },
                "model": { "x-parameter": "choice", "enum": ["a", "b"] },
                "stream": { "x-parameter": "bool" },
                "max_tokens": { "x-parameter": "int" },
                "extra": { "x-parameter": "dict" },
                "odd": { "x-parameter": "something-new" }
            }
        }));
        let params = openapi_to_parameters(&schema);
        let input_flags: Vec<(&str, bool)> =
            params.iter().map(|p| (p.name.as_str(), p.input)).collect();
        assert_eq!(
            input_flags,
            vec![
                ("inputs", true),
                ("document", true),
                ("model", false),
                ("stream", false),
                ("max_tokens", false),
                ("extra", false),
                ("odd", false),
            ]
        );
        assert_eq!(params[1].kind, ParameterType::FileUrl);
        assert_eq!(params[2].kind, ParameterType::Array);
        assert_eq!(params[2].options, vec![json!("a"), json!("b")]);
        assert_eq!(params[3].kind, ParameterType::Boolean);
        assert_eq!(params[4].kind, ParameterType::Integer);
        assert_eq!(params[5].kind, ParameterType::Object);
        assert_eq!(params[6].kind, ParameterType::String);
    }

    #[test]
    fn test_grouped_choice_keeps_choices() {
        let schema = schema_with_body(json!({
            "properties": {
                "model": {
                    "x-parameter": "grouped_choice",
                    "choices": { "OpenAI": ["gpt-4o"], "Mistral": ["mistral-small"] },
                    "default": "gpt-4o"
                },
                "top_p": { "x-parameter": "float", "choices": { "ignored": [] } }
            }
        }));
        let params = openapi_to_parameters(&schema);
        let choices = params[0].choices.as_ref().unwrap();
        assert_eq!(choices.keys().collect::<Vec<_>>(), vec!["OpenAI", "Mistral"]);
        assert_eq!(params[0].default, json!("gpt-4o"));
        assert!(params[1].choices.is_none());
    }

    #[test]
    fn test_detect_chat_variant() {
        let chat = schema_with_body(json!({
            "properties": { "inputs": { "x-parameter": "messages" } }
        }));
        let completion = schema_with_body(json!({
            "properties": { "inputs": { "x-parameter": "text" } }
        }));
        assert!(detect_chat_variant(&chat));
        assert!(!detect_chat_variant(&completion));
        assert!(!detect_chat_variant(&json!({})));
    }

    #[test]
    fn test_unresolvable_schema_degrades_to_empty() {
        let no_ref = json!({ "paths": { "/generate": { "post": {} } } });
        assert_eq!(body_schema_name(&no_ref), "");
        assert!(openapi_to_parameters(&no_ref).is_empty());
        assert_eq!(
            resolve_body_schema(&no_ref).unwrap_err(),
            SchemaResolutionError::NoBodyReference
        );

        let mut dangling = schema_with_body(json!({ "properties": { "a": {} } }));
        dangling["components"]["schemas"] = json!({});
        assert!(openapi_to_parameters(&dangling).is_empty());
        assert_eq!(
            resolve_body_schema(&dangling).unwrap_err(),
            SchemaResolutionError::UnknownSchema("Body".to_string())
        );
    }

    #[test]
    fn test_split_parameters() {
        let schema = schema_with_body(json!({
            "properties": {
                "country": {},
                "temperature": { "x-parameter": "float" },
                "city": {},
                "prompt": { "x-parameter": "text" }
            }
        }));
        let (inputs, options) = split_parameters(openapi_to_parameters(&schema));
        let names = |ps: &[Parameter]| ps.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&inputs), vec!["country", "city"]);
        assert_eq!(names(&options), vec!["temperature", "prompt"]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("max_tokens"), "Max tokens");
        assert_eq!(display_name("prompt"), "Prompt");
        assert_eq!(display_name(""), "");
    }
}
