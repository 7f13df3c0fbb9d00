//! Live parameter values wrapped with a stable id and their metadata.
//!
//! Ids are generated once, when a value is first wrapped. Edits replace the
//! `value` and never touch the id, so an edit can always be routed back to the
//! element it was made on, even after the surrounding list was replaced.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::parameter::{display_name, Parameter, ParameterType};

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Next value of the process-wide sequence shared by ids and run tickets.
pub fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

pub fn next_id(prefix: &str) -> String {
    format!("{}-{}", prefix, next_sequence())
}

/// The control family a value is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Compound,
}

impl ValueKind {
    fn id_prefix(self) -> &'static str {
        match self {
            ValueKind::String => "str",
            ValueKind::Number => "num",
            ValueKind::Boolean => "bool",
            ValueKind::Array => "arr",
            ValueKind::Object => "obj",
            ValueKind::Compound => "cmp",
        }
    }
}

/// A selectable option, optionally grouped (grouped choices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl SelectOption {
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMetadata {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub is_integer: bool,
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
}

impl ConfigMetadata {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            min: None,
            max: None,
            is_integer: false,
            options: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Current value of a config entry. Lists hold wrapped elements so each one
/// keeps its own id and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<EnhancedValue>),
    Object(Map<String, Value>),
}

impl ConfigValue {
    pub fn as_text(&self) -> String {
        match self {
            ConfigValue::Text(s) => s.clone(),
            ConfigValue::Number(n) => n.to_string(),
            ConfigValue::Boolean(b) => b.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedValue<T = ConfigValue> {
    #[serde(rename = "__id")]
    pub id: String,
    #[serde(rename = "__metadata")]
    pub metadata: ConfigMetadata,
    pub value: T,
}

impl<T> EnhancedValue<T> {
    pub fn new(metadata: ConfigMetadata, value: T) -> Self {
        Self {
            id: next_id(metadata.kind.id_prefix()),
            metadata,
            value,
        }
    }

    /// Same entry, new value. The id is kept.
    pub fn with_value(&self, value: T) -> Self {
        Self {
            id: self.id.clone(),
            metadata: self.metadata.clone(),
            value,
        }
    }
}

impl EnhancedValue {
    /// Wrap a plain JSON value, inferring the metadata kind from its shape.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::new(ConfigMetadata::new(ValueKind::Boolean), ConfigValue::Boolean(*b)),
            Value::Number(n) => {
                let mut metadata = ConfigMetadata::new(ValueKind::Number);
                metadata.is_integer = n.is_i64() || n.is_u64();
                Self::new(metadata, ConfigValue::Number(n.as_f64().unwrap_or_default()))
            }
            Value::String(s) => Self::new(ConfigMetadata::new(ValueKind::String), ConfigValue::Text(s.clone())),
            Value::Array(items) => Self::new(
                ConfigMetadata::new(ValueKind::Array),
                ConfigValue::List(items.iter().map(Self::from_json).collect()),
            ),
            Value::Object(map) => Self::new(ConfigMetadata::new(ValueKind::Object), ConfigValue::Object(map.clone())),
            Value::Null => Self::new(ConfigMetadata::new(ValueKind::String), ConfigValue::Null),
        }
    }

    /// Plain JSON for sending back to a variant service.
    pub fn raw_value(&self) -> Value {
        match &self.value {
            ConfigValue::Null => Value::Null,
            ConfigValue::Boolean(b) => Value::Bool(*b),
            ConfigValue::Number(n) if self.metadata.is_integer && n.fract() == 0.0 => {
                Value::from(*n as i64)
            }
            ConfigValue::Number(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
            ConfigValue::Text(s) => Value::String(s.clone()),
            ConfigValue::List(items) => Value::Array(items.iter().map(EnhancedValue::raw_value).collect()),
            ConfigValue::Object(map) => Value::Object(map.clone()),
        }
    }
}

/// A named top-level entry of a variant's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    pub name: String,
    pub value: EnhancedValue,
}

fn parameter_metadata(parameter: &Parameter) -> ConfigMetadata {
    let title = display_name(&parameter.name);
    let string_options = |values: &[Value]| -> Option<Vec<SelectOption>> {
        let options: Vec<SelectOption> = values
            .iter()
            .filter_map(|v| v.as_str().map(SelectOption::plain))
            .collect();
        (!options.is_empty()).then_some(options)
    };

    match parameter.kind {
        ParameterType::String | ParameterType::FileUrl | ParameterType::Array => {
            let mut metadata = ConfigMetadata::new(ValueKind::String).titled(title);
            metadata.options = string_options(&parameter.options);
            metadata
        }
        ParameterType::GroupedChoice => {
            let mut metadata = ConfigMetadata::new(ValueKind::String).titled(title);
            let grouped: Vec<SelectOption> = parameter
                .choices
                .iter()
                .flatten()
                .flat_map(|(group, values)| {
                    values
                        .as_array()
                        .into_iter()
                        .flatten()
                        .filter_map(Value::as_str)
                        .map(move |v| SelectOption {
                            group: Some(group.clone()),
                            ..SelectOption::plain(v)
                        })
                })
                .collect();
            metadata.options = (!grouped.is_empty()).then_some(grouped);
            metadata
        }
        ParameterType::Number | ParameterType::Integer => {
            let mut metadata = ConfigMetadata::new(ValueKind::Number).titled(title);
            metadata.min = Some(parameter.minimum);
            metadata.max = Some(parameter.maximum);
            metadata.is_integer = parameter.kind == ParameterType::Integer;
            metadata
        }
        ParameterType::Boolean => ConfigMetadata::new(ValueKind::Boolean).titled(title),
        ParameterType::Object => ConfigMetadata::new(ValueKind::Object).titled(title),
    }
}

fn value_for(metadata: &ConfigMetadata, raw: &Value) -> ConfigValue {
    match (metadata.kind, raw) {
        (_, Value::Null) => ConfigValue::Null,
        (ValueKind::Number, Value::Number(n)) => ConfigValue::Number(n.as_f64().unwrap_or_default()),
        (ValueKind::Number, Value::String(s)) => s
            .parse::<f64>()
            .map(ConfigValue::Number)
            .unwrap_or(ConfigValue::Null),
        (ValueKind::Boolean, Value::Bool(b)) => ConfigValue::Boolean(*b),
        (ValueKind::String, Value::String(s)) => ConfigValue::Text(s.clone()),
        (ValueKind::String, Value::Number(n)) => ConfigValue::Text(n.to_string()),
        (ValueKind::Object, Value::Object(map)) => ConfigValue::Object(map.clone()),
        (_, other) => EnhancedValue::from_json(other).value,
    }
}

/// Wrap a parsed parameter. `current` overrides the schema default, e.g.
/// with the values a saved variant was stored with.
pub fn enhance_parameter(parameter: &Parameter, current: Option<&Value>) -> EnhancedValue {
    let raw = current.unwrap_or(&parameter.default);
    let mut metadata = parameter_metadata(parameter);
    if let Value::Array(items) = raw {
        metadata.kind = ValueKind::Array;
        let items = items.iter().map(EnhancedValue::from_json).collect();
        return EnhancedValue::new(metadata, ConfigValue::List(items));
    }
    let value = value_for(&metadata, raw);
    EnhancedValue::new(metadata, value)
}

pub fn enhance_parameters(parameters: &[Parameter], current: &Map<String, Value>) -> Vec<ConfigField> {
    parameters
        .iter()
        .map(|p| ConfigField {
            name: p.name.clone(),
            value: enhance_parameter(p, current.get(&p.name)),
        })
        .collect()
}

pub fn collect_values(fields: &[ConfigField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.name.clone(), f.value.raw_value()))
        .collect()
}

/// Copy of `array` with the element identified by `id` holding `new_value`.
/// Every other element, and the order, is unchanged.
pub fn replace_array_item(array: &[EnhancedValue], id: &str, new_value: ConfigValue) -> Vec<EnhancedValue> {
    let mut next = array.to_vec();
    if let Some(item) = next.iter_mut().find(|item| item.id == id) {
        item.value = new_value;
    }
    next
}

/// Replace one element by id and report the whole array to `handle_change`.
///
/// `handle_change` runs even when no element matches, with an unchanged copy,
/// so callers always get their re-render signal.
pub fn update_array_item<F>(array: &[EnhancedValue], id: &str, new_value: ConfigValue, handle_change: F)
where
    F: FnOnce(Vec<EnhancedValue>),
{
    handle_change(replace_array_item(array, id, new_value));
}
