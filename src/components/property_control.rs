use leptos::prelude::*;

use crate::playground::controls::{describe_control, group_options, ControlSpec, ListEntry, RenderHints};
use crate::playground::enhanced::{update_array_item, ConfigValue, EnhancedValue, SelectOption};

/// Renders the control for one editable value and reports edits through
/// `on_change`. The DOM is only rebuilt when the control's shape changes
/// (kind, label, options, list membership); values are bound reactively so
/// inputs keep focus while the user types.
#[component]
pub fn PropertyControl(
    #[prop(into)] value: Signal<EnhancedValue>,
    #[prop(into)] on_change: Callback<ConfigValue>,
    #[prop(optional)] hints: RenderHints,
) -> impl IntoView {
    let shape = Memo::new(move |_| value.with(|v| shape_of(describe_control(v, &hints))));
    let current = Signal::derive(move || value.with(|v| v.value.clone()));

    move || match shape.get() {
        ControlSpec::List(entries) => {
            let items = entries
                .into_iter()
                .map(|entry| list_item(entry, value, on_change))
                .collect_view();
            view! { <div class="control control-list">{items}</div> }.into_any()
        }
        leaf => render_leaf(leaf, current, on_change),
    }
}

/// One array element, edited through its id so that every edit starts from
/// the array as it is at that moment.
fn list_item(entry: ListEntry, array: Signal<EnhancedValue>, on_change: Callback<ConfigValue>) -> AnyView {
    let ListEntry { id, control } = entry;

    let read_id = id.clone();
    let item_value = Signal::derive(move || {
        array.with(|v| match &v.value {
            ConfigValue::List(items) => items
                .iter()
                .find(|item| item.id == read_id)
                .map(|item| item.value.clone())
                .unwrap_or(ConfigValue::Null),
            _ => ConfigValue::Null,
        })
    });

    let on_item_change = Callback::new(move |next: ConfigValue| {
        let items = array.with_untracked(|v| match &v.value {
            ConfigValue::List(items) => Some(items.clone()),
            _ => None,
        });
        if let Some(items) = items {
            update_array_item(&items, &id, next, |updated| on_change.run(ConfigValue::List(updated)));
        }
    });

    view! { <div class="control-list-item">{render_leaf(control, item_value, on_item_change)}</div> }.into_any()
}

fn render_leaf(spec: ControlSpec, current: Signal<ConfigValue>, on_change: Callback<ConfigValue>) -> AnyView {
    match spec {
        ControlSpec::MinMax {
            label,
            description,
            min,
            max,
            step,
            ..
        } => {
            let number = move || match current.get() {
                ConfigValue::Number(n) => n,
                _ => min,
            };
            view! {
                <div class="control control-minmax">
                    <div class="control-header">
                        <label>{label}</label>
                        <span class="control-value">{move || format_number(number())}</span>
                    </div>
                    {match max {
                        Some(max) => view! {
                            <input
                                type="range"
                                min=min.to_string()
                                max=max.to_string()
                                step=step.to_string()
                                prop:value=move || number().to_string()
                                on:input=move |ev| {
                                    if let Ok(n) = event_target_value(&ev).parse::<f64>() {
                                        on_change.run(ConfigValue::Number(n));
                                    }
                                }
                            />
                        }
                        .into_any(),
                        None => view! {
                            <input
                                type="number"
                                class="input control-number"
                                min=min.to_string()
                                step=step.to_string()
                                prop:value=move || number().to_string()
                                on:input=move |ev| {
                                    if let Ok(n) = event_target_value(&ev).parse::<f64>() {
                                        on_change.run(ConfigValue::Number(n));
                                    }
                                }
                            />
                        }
                        .into_any(),
                    }}
                    {description.map(|d| view! { <p class="control-description">{d}</p> })}
                </div>
            }
            .into_any()
        }
        ControlSpec::Toggle { label, .. } => view! {
            <label class="control control-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || matches!(current.get(), ConfigValue::Boolean(true))
                    on:change=move |ev| on_change.run(ConfigValue::Boolean(event_target_checked(&ev)))
                />
                <span>{label}</span>
            </label>
        }
        .into_any(),
        ControlSpec::Dropdown {
            options, placeholder, ..
        } => view! {
            <div class="control control-dropdown">
                <select
                    class="input control-select"
                    on:change=move |ev| on_change.run(ConfigValue::Text(event_target_value(&ev)))
                >
                    {placeholder.map(|p| view! { <option value="" disabled=true>{p}</option> })}
                    {option_groups(&options, current)}
                </select>
            </div>
        }
        .into_any(),
        ControlSpec::MultiSelect {
            label,
            description,
            options,
            ..
        } => view! {
            <div class="control control-select-field">
                <label>{label}</label>
                <select
                    class="input control-select"
                    on:change=move |ev| on_change.run(ConfigValue::Text(event_target_value(&ev)))
                >
                    {option_groups(&options, current)}
                </select>
                {description.map(|d| view! { <p class="control-description">{d}</p> })}
            </div>
        }
        .into_any(),
        ControlSpec::PromptContent { placeholder, .. } => view! {
            <div class="control control-prompt">
                <textarea
                    class="input prompt-textarea"
                    rows="6"
                    placeholder=placeholder.unwrap_or_default()
                    prop:value=move || current.get().as_text()
                    on:input=move |ev| on_change.run(ConfigValue::Text(event_target_value(&ev)))
                ></textarea>
            </div>
        }
        .into_any(),
        ControlSpec::Text { label, description, .. } => view! {
            <div class="control control-text">
                <label>{label}</label>
                <input
                    type="text"
                    class="input"
                    prop:value=move || current.get().as_text()
                    on:input=move |ev| on_change.run(ConfigValue::Text(event_target_value(&ev)))
                />
                {description.map(|d| view! { <p class="control-description">{d}</p> })}
            </div>
        }
        .into_any(),
        ControlSpec::NotImplemented(message) => view! {
            <div class="control control-unsupported">
                <span class="status-text status-not-set">{message}</span>
            </div>
        }
        .into_any(),
        ControlSpec::List(_) | ControlSpec::Nothing => ().into_any(),
    }
}

/// Options are marked selected individually; a `value` set on the `<select>`
/// would be applied before its options exist.
fn option_groups(options: &[SelectOption], current: Signal<ConfigValue>) -> AnyView {
    group_options(options)
        .into_iter()
        .map(|(group, members)| {
            let rendered = members
                .into_iter()
                .map(|o| {
                    let value = o.value.clone();
                    view! {
                        <option
                            value=o.value
                            prop:selected=move || current.with(|c| c.as_text() == value)
                        >
                            {o.label}
                        </option>
                    }
                })
                .collect_view();
            match group {
                Some(group) => view! { <optgroup label=group>{rendered}</optgroup> }.into_any(),
                None => rendered.into_any(),
            }
        })
        .collect_view()
        .into_any()
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}

/// The control description with every current value blanked, so that two specs compare equal
/// whenever they would produce the same DOM.
fn shape_of(spec: ControlSpec) -> ControlSpec {
    match spec {
        ControlSpec::MinMax {
            label,
            description,
            min,
            max,
            step,
            ..
        } => ControlSpec::MinMax {
            label,
            description,
            value: 0.0,
            min,
            max,
            step,
        },
        ControlSpec::Toggle { label, .. } => ControlSpec::Toggle { label, value: false },
        ControlSpec::Dropdown {
            options, placeholder, ..
        } => ControlSpec::Dropdown {
            value: String::new(),
            options,
            placeholder,
        },
        ControlSpec::MultiSelect {
            label,
            description,
            options,
            ..
        } => ControlSpec::MultiSelect {
            label,
            description,
            value: String::new(),
            options,
        },
        ControlSpec::PromptContent { placeholder, .. } => ControlSpec::PromptContent {
            value: String::new(),
            placeholder,
        },
        ControlSpec::Text { label, description, .. } => ControlSpec::Text {
            label,
            description,
            value: String::new(),
        },
        ControlSpec::List(entries) => ControlSpec::List(
            entries
                .into_iter()
                .map(|e| ListEntry {
                    id: e.id,
                    control: shape_of(e.control),
                })
                .collect(),
        ),
        other @ (ControlSpec::NotImplemented(_) | ControlSpec::Nothing) => other,
    }
}
