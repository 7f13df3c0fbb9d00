//! Value kind → control dispatch.
//!
//! [`describe_control`] decides which control an [`EnhancedValue`] gets and
//! with which settings. The Leptos side (`components::property_control`) only
//! turns the resulting [`ControlSpec`] into DOM and wires edits back.

use super::enhanced::{ConfigMetadata, ConfigValue, EnhancedValue, SelectOption, ValueKind};
use super::parameter::display_name;

/// How a string control with options, or a free-text control, should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderAs {
    #[default]
    Default,
    SimpleDropdownSelect,
    PromptMessageContent,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderHints {
    pub render_as: RenderAs,
    pub placeholder: Option<String>,
    pub with_tooltip: bool,
}

impl RenderHints {
    pub fn render_as(render_as: RenderAs) -> Self {
        Self {
            render_as,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlSpec {
    MinMax {
        label: String,
        description: Option<String>,
        value: f64,
        min: f64,
        /// `None` for values without an upper bound, such as array items.
        max: Option<f64>,
        step: f64,
    },
    Toggle {
        label: String,
        value: bool,
    },
    Dropdown {
        value: String,
        options: Vec<SelectOption>,
        placeholder: Option<String>,
    },
    MultiSelect {
        label: String,
        description: Option<String>,
        value: String,
        options: Vec<SelectOption>,
    },
    PromptContent {
        value: String,
        placeholder: Option<String>,
    },
    Text {
        label: String,
        description: Option<String>,
        value: String,
    },
    List(Vec<ListEntry>),
    NotImplemented(&'static str),
    Nothing,
}

/// One element of an array control, addressed by its stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: String,
    pub control: ControlSpec,
}

pub fn describe_control(value: &EnhancedValue, hints: &RenderHints) -> ControlSpec {
    let metadata = &value.metadata;
    match metadata.kind {
        ValueKind::Number => number_control(metadata, &value.value),
        ValueKind::Boolean => ControlSpec::Toggle {
            label: label(metadata),
            value: matches!(value.value, ConfigValue::Boolean(true)),
        },
        ValueKind::String => string_control(metadata, &value.value, hints),
        ValueKind::Array => array_control(&value.value, hints),
        ValueKind::Object => ControlSpec::NotImplemented("Object input not implemented"),
        ValueKind::Compound => ControlSpec::NotImplemented("Compound input not implemented"),
    }
}

fn label(metadata: &ConfigMetadata) -> String {
    metadata.title.clone().unwrap_or_default()
}

fn number_control(metadata: &ConfigMetadata, value: &ConfigValue) -> ControlSpec {
    let min = metadata.min.unwrap_or(0.0);
    let current = match value {
        ConfigValue::Number(n) => *n,
        _ => min,
    };
    ControlSpec::MinMax {
        label: label(metadata),
        description: metadata.description.clone(),
        value: current,
        min,
        max: metadata.max,
        step: if metadata.is_integer { 1.0 } else { 0.1 },
    }
}

fn string_control(metadata: &ConfigMetadata, value: &ConfigValue, hints: &RenderHints) -> ControlSpec {
    let text = value.as_text();

    if let Some(options) = &metadata.options {
        if hints.render_as == RenderAs::SimpleDropdownSelect {
            return ControlSpec::Dropdown {
                value: text,
                options: options.clone(),
                placeholder: metadata.description.clone(),
            };
        }
        return ControlSpec::MultiSelect {
            label: label(metadata),
            description: metadata.description.clone(),
            value: text,
            options: options.clone(),
        };
    }

    if hints.render_as == RenderAs::PromptMessageContent {
        return ControlSpec::PromptContent {
            value: text,
            placeholder: metadata
                .description
                .clone()
                .or_else(|| hints.placeholder.clone()),
        };
    }

    ControlSpec::Text {
        label: label(metadata),
        description: metadata.description.clone(),
        value: text,
    }
}

fn array_control(value: &ConfigValue, hints: &RenderHints) -> ControlSpec {
    let ConfigValue::List(items) = value else {
        return ControlSpec::Nothing;
    };

    let item_hints = RenderHints {
        with_tooltip: hints.with_tooltip,
        ..RenderHints::default()
    };

    ControlSpec::List(
        items
            .iter()
            .map(|item| ListEntry {
                id: item.id.clone(),
                control: match item.metadata.kind {
                    ValueKind::String | ValueKind::Number | ValueKind::Boolean => {
                        describe_control(item, &item_hints)
                    }
                    ValueKind::Array | ValueKind::Object | ValueKind::Compound => ControlSpec::Nothing,
                },
            })
            .collect(),
    )
}

/// Hints for a top-level variant field: prompt-like names get the prompt
/// editor, grouped choices the compact dropdown.
pub fn hints_for_field(name: &str, value: &EnhancedValue) -> RenderHints {
    let grouped = value
        .metadata
        .options
        .as_ref()
        .is_some_and(|options| options.iter().any(|o| o.group.is_some()));
    let render_as = if grouped {
        RenderAs::SimpleDropdownSelect
    } else if name.contains("prompt") {
        RenderAs::PromptMessageContent
    } else {
        RenderAs::Default
    };
    RenderHints {
        render_as,
        placeholder: Some(format!("Enter {}", display_name(name).to_lowercase())),
        with_tooltip: false,
    }
}

/// Options bucketed by group, groups in first-seen order. Ungrouped options
/// share the `None` bucket.
pub fn group_options(options: &[SelectOption]) -> Vec<(Option<String>, Vec<SelectOption>)> {
    let mut groups: Vec<(Option<String>, Vec<SelectOption>)> = Vec::new();
    for option in options {
        match groups.iter_mut().find(|(group, _)| *group == option.group) {
            Some((_, members)) => members.push(option.clone()),
            None => groups.push((option.group.clone(), vec![option.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(min: f64, max: f64, integer: bool, value: f64) -> EnhancedValue {
        let mut metadata = ConfigMetadata::new(ValueKind::Number).titled("Temperature");
        metadata.min = Some(min);
        metadata.max = Some(max);
        metadata.is_integer = integer;
        EnhancedValue::new(metadata, ConfigValue::Number(value))
    }

    fn text_with_options() -> EnhancedValue {
        let mut metadata = ConfigMetadata::new(ValueKind::String).titled("Model");
        metadata.options = Some(vec![SelectOption::plain("a"), SelectOption::plain("b")]);
        EnhancedValue::new(metadata, ConfigValue::Text("a".into()))
    }

    #[test]
    fn test_number_step_follows_integer_flag() {
        let float = describe_control(&number(0.0, 2.0, false, 0.7), &RenderHints::default());
        let int = describe_control(&number(1.0, 4096.0, true, 256.0), &RenderHints::default());

        match float {
            ControlSpec::MinMax { step, min, max, value, .. } => {
                assert_eq!(step, 0.1);
                assert_eq!((min, max, value), (0.0, Some(2.0), 0.7));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(int, ControlSpec::MinMax { step, .. } if step == 1.0));
    }

    #[test]
    fn test_boolean_toggle() {
        let value = EnhancedValue::new(
            ConfigMetadata::new(ValueKind::Boolean).titled("Stream"),
            ConfigValue::Boolean(true),
        );
        assert_eq!(
            describe_control(&value, &RenderHints::default()),
            ControlSpec::Toggle {
                label: "Stream".into(),
                value: true
            }
        );
    }

    #[test]
    fn test_string_with_options_dropdown_or_multiselect() {
        let value = text_with_options();
        assert!(matches!(
            describe_control(&value, &RenderHints::render_as(RenderAs::SimpleDropdownSelect)),
            ControlSpec::Dropdown { .. }
        ));
        assert!(matches!(
            describe_control(&value, &RenderHints::default()),
            ControlSpec::MultiSelect { .. }
        ));
        // options win over the prompt hint
        assert!(matches!(
            describe_control(&value, &RenderHints::render_as(RenderAs::PromptMessageContent)),
            ControlSpec::MultiSelect { .. }
        ));
    }

    #[test]
    fn test_string_prompt_and_plain_text() {
        let value = EnhancedValue::new(
            ConfigMetadata::new(ValueKind::String).titled("Prompt"),
            ConfigValue::Text("Tell me a joke".into()),
        );
        let hints = RenderHints {
            render_as: RenderAs::PromptMessageContent,
            placeholder: Some("Enter a prompt".into()),
            with_tooltip: false,
        };
        assert_eq!(
            describe_control(&value, &hints),
            ControlSpec::PromptContent {
                value: "Tell me a joke".into(),
                placeholder: Some("Enter a prompt".into())
            }
        );
        assert!(matches!(
            describe_control(&value, &RenderHints::default()),
            ControlSpec::Text { ref value, .. } if value == "Tell me a joke"
        ));
    }

    #[test]
    fn test_array_dispatches_per_item_kind() {
        let value = EnhancedValue::from_json(&json!(["stop", 3, false, {"nested": true}, [1]]));
        let ControlSpec::List(entries) = describe_control(&value, &RenderHints::default()) else {
            panic!("expected list control");
        };
        assert_eq!(entries.len(), 5);
        assert!(matches!(entries[0].control, ControlSpec::Text { .. }));
        assert!(matches!(entries[1].control, ControlSpec::MinMax { .. }));
        assert!(matches!(entries[2].control, ControlSpec::Toggle { value: false, .. }));
        assert_eq!(entries[3].control, ControlSpec::Nothing);
        assert_eq!(entries[4].control, ControlSpec::Nothing);

        let ConfigValue::List(items) = &value.value else { unreachable!() };
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let expected: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_unbounded_number_item_keeps_bounds_across_edits() {
        let value = EnhancedValue::from_json(&json!([3, 0.5]));
        let ConfigValue::List(items) = &value.value else { unreachable!() };
        let before = describe_control(&items[0], &RenderHints::default());
        let after = describe_control(&items[0].with_value(ConfigValue::Number(2.0)), &RenderHints::default());

        match (before, after) {
            (
                ControlSpec::MinMax { min: min_a, max: max_a, value: a, .. },
                ControlSpec::MinMax { min: min_b, max: max_b, value: b, .. },
            ) => {
                assert_eq!((a, b), (3.0, 2.0));
                assert_eq!((min_a, max_a), (0.0, None));
                assert_eq!((min_b, max_b), (min_a, max_a));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_array_with_non_list_value_renders_nothing() {
        let value = EnhancedValue::new(
            ConfigMetadata::new(ValueKind::Array),
            ConfigValue::Text("not a list".into()),
        );
        assert_eq!(describe_control(&value, &RenderHints::default()), ControlSpec::Nothing);
    }

    #[test]
    fn test_object_and_compound_not_implemented() {
        let object = EnhancedValue::from_json(&json!({"a": 1}));
        let compound = EnhancedValue::new(ConfigMetadata::new(ValueKind::Compound), ConfigValue::Null);
        assert_eq!(
            describe_control(&object, &RenderHints::default()),
            ControlSpec::NotImplemented("Object input not implemented")
        );
        assert_eq!(
            describe_control(&compound, &RenderHints::default()),
            ControlSpec::NotImplemented("Compound input not implemented")
        );
    }

    #[test]
    fn test_hints_for_field() {
        let prompt = EnhancedValue::from_json(&json!("You are helpful"));
        let hints = hints_for_field("prompt_system", &prompt);
        assert_eq!(hints.render_as, RenderAs::PromptMessageContent);
        assert_eq!(hints.placeholder.as_deref(), Some("Enter prompt system"));

        let mut metadata = ConfigMetadata::new(ValueKind::String);
        metadata.options = Some(vec![SelectOption {
            group: Some("OpenAI".into()),
            ..SelectOption::plain("gpt-4o")
        }]);
        let model = EnhancedValue::new(metadata, ConfigValue::Text("gpt-4o".into()));
        assert_eq!(hints_for_field("model", &model).render_as, RenderAs::SimpleDropdownSelect);
        assert_eq!(hints_for_field("model", &prompt).render_as, RenderAs::Default);
    }

    #[test]
    fn test_group_options_keeps_first_seen_order() {
        let grouped = |group: &str, value: &str| SelectOption {
            group: Some(group.to_string()),
            ..SelectOption::plain(value)
        };
        let options = vec![
            grouped("OpenAI", "gpt-4o"),
            grouped("Mistral", "mistral-small"),
            grouped("OpenAI", "gpt-4o-mini"),
            SelectOption::plain("custom"),
        ];
        let groups = group_options(&options);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0.as_deref(), Some("OpenAI"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0.as_deref(), Some("Mistral"));
        assert_eq!(groups[2].0, None);
    }
}
