use leptos::prelude::*;
use serde_json::{Map, Value};
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::property_control::PropertyControl;
use crate::evaluators::{
    build_config_payload, evaluator_fields, project_testcase, split_advanced, split_chat_testcase, Evaluator,
    SettingsField,
};
use crate::pages::use_app_id;
use crate::playground::controls::RenderHints;
use crate::playground::enhanced::{ConfigValue, EnhancedValue};
use crate::playground::parameter::{detect_chat_variant, openapi_to_parameters, split_parameters};
use crate::playground::run::{format_run_result, RunController, RunDisplay, RunOutcome, RunTicket};
use crate::playground::variants::Variant;

/// A settings-template field and its current value.
#[derive(Debug, Clone, PartialEq)]
struct FormField {
    field: SettingsField,
    value: EnhancedValue,
}

impl FormField {
    fn new(field: SettingsField) -> Self {
        let value = field.to_value(None);
        Self { field, value }
    }
}

fn collect_settings(fields: &[FormField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.field.key.clone(), f.value.raw_value()))
        .collect()
}

#[component]
pub fn EvaluatorsPage() -> impl IntoView {
    let app_id = use_app_id();
    let (evaluators, set_evaluators) = signal::<Vec<Evaluator>>(Vec::new());
    let (selected, set_selected) = signal::<Option<Evaluator>>(None);
    let (config_name, set_config_name) = signal(String::new());
    let (config_id, set_config_id) = signal::<Option<String>>(None);
    let basic = RwSignal::new(Vec::<FormField>::new());
    let advanced = RwSignal::new(Vec::<FormField>::new());
    let (show_advanced, set_show_advanced) = signal(false);
    let (submitting, set_submitting) = signal(false);
    let (form_status, set_form_status) = signal::<Option<Result<String, String>>>(None);
    let (load_error, set_load_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_evaluators().await {
                Ok(list) => set_evaluators.set(list),
                Err(e) => set_load_error.set(Some(format!("Failed to load evaluators: {}", e))),
            }
        });
    });

    let choose_evaluator = move |key: String| {
        let evaluator = evaluators.with_untracked(|list| list.iter().find(|e| e.key == key).cloned());
        let (basic_fields, advanced_fields) = evaluator
            .as_ref()
            .map(|e| split_advanced(&evaluator_fields(e)))
            .unwrap_or_default();
        basic.set(basic_fields.into_iter().map(FormField::new).collect());
        advanced.set(advanced_fields.into_iter().map(FormField::new).collect());
        set_selected.set(evaluator);
        set_config_id.set(None);
        set_form_status.set(None);
    };

    let submit = move |_| {
        let Some(evaluator) = selected.get_untracked() else {
            set_form_status.set(Some(Err("Choose an evaluator first".to_string())));
            return;
        };
        let mut values = basic.with_untracked(|f| collect_settings(f));
        values.extend(advanced.with_untracked(|f| collect_settings(f)));

        let payload = match build_config_payload(&config_name.get_untracked(), &evaluator, values) {
            Ok(payload) => payload,
            Err(e) => {
                set_form_status.set(Some(Err(e.to_string())));
                return;
            }
        };

        let app = app_id.get_untracked();
        let existing = config_id.get_untracked();
        set_submitting.set(true);
        set_form_status.set(None);
        spawn_local(async move {
            let result = match existing {
                Some(id) => commands::update_evaluator_config(&id, &payload).await.map(|_| id),
                None => commands::create_evaluator_config(&app, &payload).await,
            };
            match result {
                Ok(id) => {
                    set_config_id.set(Some(id));
                    set_form_status.set(Some(Ok(format!("Saved configuration \"{}\"", payload.name))));
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Evaluator config save failed: {}", e).into());
                    set_form_status.set(Some(Err(format!("Failed to save: {}", e))));
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="page evaluators-page">
            <h2>"Evaluators"</h2>
            <p class="page-description">"Configure an evaluator for this app and try it on a testcase."</p>

            {move || load_error.get().map(|e| view! {
                <div class="health-error"><span class="status-text status-error">{e}</span></div>
            })}

            <section class="settings-section">
                <h3>"Configuration"</h3>

                <div class="form-group">
                    <label for="evaluator-key">"Evaluator"</label>
                    <select
                        id="evaluator-key"
                        class="input"
                        on:change=move |ev| choose_evaluator(event_target_value(&ev))
                    >
                        <option value="" selected=true disabled=true>"Select an evaluator"</option>
                        <For
                            each=move || evaluators.get()
                            key=|e| e.key.clone()
                            children=move |e| view! { <option value=e.key.clone()>{e.name.clone()}</option> }
                        />
                    </select>
                    {move || selected.get().and_then(|e| e.description).map(|d| view! {
                        <p class="section-description">{d}</p>
                    })}
                </div>

                <div class="form-group">
                    <label for="config-name">"Name"</label>
                    <input
                        id="config-name"
                        type="text"
                        class="input"
                        placeholder="Enter a unique name"
                        prop:value=move || config_name.get()
                        on:input=move |ev| set_config_name.set(event_target_value(&ev))
                    />
                </div>

                <SettingsFields fields=basic />

                <Show when=move || advanced.with(|f| !f.is_empty())>
                    <button class="btn btn-small" on:click=move |_| set_show_advanced.update(|v| *v = !*v)>
                        {move || if show_advanced.get() { "Hide advanced settings" } else { "Advanced settings" }}
                    </button>
                    <Show when=move || show_advanced.get()>
                        <SettingsFields fields=advanced />
                    </Show>
                </Show>

                <div class="input-row">
                    <button class="btn btn-primary" on:click=submit disabled=move || submitting.get()>
                        {move || if submitting.get() { "Saving..." } else { "Save configuration" }}
                    </button>
                    {move || form_status.get().map(|status| match status {
                        Ok(msg) => view! { <span class="status-text status-saved">{msg}</span> }.into_any(),
                        Err(e) => view! { <span class="status-text status-error">{e}</span> }.into_any(),
                    })}
                </div>
            </section>

            <DebugPanel app_id=app_id />
        </div>
    }
}

/// Controls for one list of evaluator settings.
#[component]
fn SettingsFields(fields: RwSignal<Vec<FormField>>) -> impl IntoView {
    view! {
        <div class="evaluator-fields">
            <For
                each=move || fields.get()
                key=|f| f.field.key.clone()
                children=move |form_field| {
                    let key = form_field.field.key.clone();
                    let lookup = key.clone();
                    let fallback = form_field.value.clone();
                    let value = Signal::derive(move || {
                        fields
                            .with(|fs| fs.iter().find(|f| f.field.key == lookup).map(|f| f.value.clone()))
                            .unwrap_or_else(|| fallback.clone())
                    });
                    let on_change = move |next: ConfigValue| {
                        fields.update(|fs| {
                            if let Some(f) = fs.iter_mut().find(|f| f.field.key == key) {
                                f.value = f.value.with_value(next);
                            }
                        });
                    };
                    let hints = RenderHints::render_as(form_field.field.render_as());
                    view! { <PropertyControl value=value on_change=on_change hints=hints /> }
                }
            />
        </div>
    }
}

/// Runs a variant on a hand-written testcase, the way an evaluation would.
#[component]
fn DebugPanel(app_id: Memo<String>) -> impl IntoView {
    let (variants, set_variants) = signal::<Vec<Variant>>(Vec::new());
    let (variant_name, set_variant_name) = signal(String::new());
    let (testcase_text, set_testcase_text) = signal(String::from("{}"));
    let (input_error, set_input_error) = signal::<Option<String>>(None);
    let run = RwSignal::new(RunController::default());

    Effect::new(move |_| {
        let id = app_id.get();
        spawn_local(async move {
            match commands::list_variants(&id).await {
                Ok(list) => {
                    if let Some(first) = list.first() {
                        set_variant_name.set(first.variant_name.clone());
                    }
                    set_variants.set(list);
                }
                Err(e) => set_input_error.set(Some(format!("Failed to load variants: {}", e))),
            }
        });
    });

    let start = move |_| {
        set_input_error.set(None);
        let testcase = match serde_json::from_str::<Value>(&testcase_text.get_untracked()) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                set_input_error.set(Some("The testcase must be a JSON object".to_string()));
                return;
            }
            Err(e) => {
                set_input_error.set(Some(format!("Invalid testcase JSON: {}", e)));
                return;
            }
        };
        let name = variant_name.get_untracked();
        let Some(variant) = variants.with_untracked(|list| list.iter().find(|v| v.variant_name == name).cloned())
        else {
            set_input_error.set(Some("Choose a variant first".to_string()));
            return;
        };
        let Some(uri) = variant.uri.clone() else {
            set_input_error.set(Some("This variant has no service URI".to_string()));
            return;
        };
        let Some(Ok(ticket)) = run.try_update(|r| r.start()) else {
            return;
        };
        spawn_local(async move {
            let outcome = match debug_run(run, ticket, &testcase, &variant, &uri).await {
                Ok(result) => RunOutcome::Succeeded(format_run_result(&result)),
                Err(e) => RunOutcome::Failed(e),
            };
            run.update(|r| {
                r.settle(ticket, outcome);
            });
        });
    };

    let cancel = move |_| {
        if let Some(Some(ticket)) = run.try_update(|r| r.cancel()) {
            spawn_local(async move {
                if let Err(e) = commands::cancel_run(ticket).await {
                    web_sys::console::error_1(&format!("Failed to cancel run: {}", e).into());
                }
            });
        }
    };

    let is_loading = move || run.with(|r| r.is_loading());

    view! {
        <section class="settings-section debug-panel">
            <h3>"Debug run"</h3>

            <div class="form-group">
                <label for="debug-variant">"Variant"</label>
                <select
                    id="debug-variant"
                    class="input"
                    on:change=move |ev| set_variant_name.set(event_target_value(&ev))
                >
                    <For
                        each=move || variants.get()
                        key=|v| v.variant_name.clone()
                        children=move |v| {
                            let current = v.variant_name.clone();
                            view! {
                                <option
                                    value=v.variant_name.clone()
                                    prop:selected=move || variant_name.with(|n| *n == current)
                                >
                                    {v.variant_name.clone()}
                                </option>
                            }
                        }
                    />
                </select>
            </div>

            <div class="form-group">
                <label for="debug-testcase">"Testcase (JSON)"</label>
                <textarea
                    id="debug-testcase"
                    class="input prompt-textarea"
                    rows="6"
                    prop:value=move || testcase_text.get()
                    on:input=move |ev| set_testcase_text.set(event_target_value(&ev))
                ></textarea>
            </div>

            {move || input_error.get().map(|e| view! { <span class="status-text status-error">{e}</span> })}

            <div class="input-row">
                <Show
                    when=is_loading
                    fallback=move || view! { <button class="btn btn-primary" on:click=start>"Run variant"</button> }
                >
                    <button class="btn" on:click=cancel>"Cancel"</button>
                </Show>
            </div>

            <div class="test-row-output">
                <Show when=is_loading>
                    <p class="run-loading">"Loading..."</p>
                </Show>
                {move || run.with(|r| match r.display() {
                    RunDisplay::Empty => ().into_any(),
                    RunDisplay::Output(text) => view! { <pre class="run-output">{text.clone()}</pre> }.into_any(),
                    RunDisplay::Error(text) => view! { <pre class="run-output run-error">{text.clone()}</pre> }.into_any(),
                })}
            </div>
        </section>
    }
}

/// Resolve the variant's inputs, shape the testcase to them and run it.
/// Nothing is sent when the run was cancelled while the schema loaded.
async fn debug_run(
    run: RwSignal<RunController>,
    ticket: RunTicket,
    testcase: &Map<String, Value>,
    variant: &Variant,
    uri: &str,
) -> Result<Value, String> {
    let schema = commands::fetch_openapi_schema(uri).await?;
    if !run.with_untracked(|r| r.is_in_flight(ticket)) {
        return Err("Run cancelled".to_string());
    }
    let (inputs, _) = split_parameters(openapi_to_parameters(&schema));

    let (testcase, history) = if detect_chat_variant(&schema) {
        split_chat_testcase(testcase)
    } else {
        (testcase.clone(), Vec::new())
    };
    let projected = project_testcase(&testcase, &inputs);

    commands::call_variant(ticket, &projected, &inputs, &variant.parameters, uri, &history).await
}
