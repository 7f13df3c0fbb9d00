use leptos::prelude::*;
use serde_json::{Map, Value};
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::property_control::PropertyControl;
use crate::components::test_view::TestView;
use crate::playground::controls::hints_for_field;
use crate::playground::enhanced::{collect_values, enhance_parameters, ConfigField, ConfigValue};
use crate::playground::parameter::{
    detect_chat_variant, openapi_to_parameters, resolve_body_schema, split_parameters, Parameter,
};
use crate::playground::variants::Variant;

/// Result of the last save, shown under the action buttons.
#[derive(Debug, Clone, PartialEq)]
enum SaveStatus {
    Saved,
    Failed(String),
}

/// Parameter editor and test rows for one variant.
///
/// Loads the variant's OpenAPI schema once; option parameters become controls
/// seeded from the variant's saved values, input parameters feed the test
/// view. Every edit is reported through `on_parameters`.
#[component]
pub fn VariantConfig(
    #[prop(into)] variant: Signal<Option<Variant>>,
    #[prop(into)] on_parameters: Callback<(String, Map<String, Value>)>,
    /// Called with the variant name and, for first saves, the new backend id.
    #[prop(into)]
    on_persist: Callback<(String, Option<String>)>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let variant_name = variant.with_untracked(|v| v.as_ref().map(|v| v.variant_name.clone()).unwrap_or_default());

    let (loading, set_loading) = signal(true);
    let (schema_error, set_schema_error) = signal::<Option<String>>(None);
    let (inputs, set_inputs) = signal::<Vec<Parameter>>(Vec::new());
    let (is_chat, set_is_chat) = signal(false);
    let fields = RwSignal::new(Vec::<ConfigField>::new());
    let (saving, set_saving) = signal(false);
    let (save_status, set_save_status) = signal::<Option<SaveStatus>>(None);

    // Load the schema on mount
    Effect::new(move |_| {
        let Some(current) = variant.get_untracked() else {
            set_loading.set(false);
            return;
        };
        let Some(uri) = current.uri.clone() else {
            set_schema_error.set(Some("This variant has no service URI".to_string()));
            set_loading.set(false);
            return;
        };
        spawn_local(async move {
            match commands::fetch_openapi_schema(&uri).await {
                Ok(schema) => {
                    let parameters = openapi_to_parameters(&schema);
                    if parameters.is_empty() {
                        if let Err(e) = resolve_body_schema(&schema) {
                            web_sys::console::warn_1(&format!("Schema of {} has no parameters: {}", uri, e).into());
                        }
                    }
                    let (input_params, option_params) = split_parameters(parameters);
                    fields.set(enhance_parameters(&option_params, &current.parameters));
                    set_inputs.set(input_params);
                    set_is_chat.set(detect_chat_variant(&schema));
                }
                Err(e) => {
                    set_schema_error.set(Some(format!("Failed to load schema: {}", e)));
                }
            }
            set_loading.set(false);
        });
    });

    let options = Signal::derive(move || fields.with(|fs| collect_values(fs)));

    let edit_name = variant_name.clone();
    let on_field_change = move |name: String, next: ConfigValue| {
        fields.update(|fs| {
            if let Some(field) = fs.iter_mut().find(|f| f.name == name) {
                field.value = field.value.with_value(next);
            }
        });
        set_save_status.set(None);
        on_parameters.run((edit_name.clone(), fields.with_untracked(|fs| collect_values(fs))));
    };

    let save = move |_| {
        let Some(current) = variant.get_untracked() else {
            return;
        };
        let values = fields.with_untracked(|fs| collect_values(fs));
        set_saving.set(true);
        set_save_status.set(None);
        spawn_local(async move {
            let result = match (current.persistent, current.variant_id.as_deref()) {
                (true, Some(id)) => commands::update_variant_parameters(id, &values).await.map(|_| None),
                _ => match current.base_id.as_deref() {
                    Some(base_id) => commands::save_new_variant(base_id, &current.variant_name, &values)
                        .await
                        .map(|saved| saved.variant_id),
                    None => Err("Variant has no base to save from".to_string()),
                },
            };
            match result {
                Ok(variant_id) => {
                    on_persist.run((current.variant_name.clone(), variant_id));
                    set_save_status.set(Some(SaveStatus::Saved));
                }
                Err(e) => {
                    set_save_status.set(Some(SaveStatus::Failed(format!("Failed to save: {}", e))));
                }
            }
            set_saving.set(false);
        });
    };

    let delete_name = variant_name.clone();
    let is_saved = move || variant.with(|v| v.as_ref().is_some_and(|v| v.persistent));

    view! {
        <div class="variant-config">
            <div class="variant-config-header">
                <h3>"Parameters"</h3>
                <div class="variant-config-actions">
                    <button
                        class="btn btn-primary"
                        on:click=save
                        disabled=move || saving.get() || loading.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save changes" }}
                    </button>
                    <Show when=is_saved>
                        <button class="btn btn-delete" on:click={
                            let name = delete_name.clone();
                            move |_| on_delete.run(name.clone())
                        }>
                            "Delete"
                        </button>
                    </Show>
                </div>
            </div>

            {move || save_status.get().map(|status| match status {
                SaveStatus::Saved => view! { <span class="status-text status-saved">"Changes saved"</span> }.into_any(),
                SaveStatus::Failed(e) => view! { <span class="status-text status-error">{e}</span> }.into_any(),
            })}

            <Show when=move || loading.get()>
                <p class="loading">"Loading schema..."</p>
            </Show>

            {move || schema_error.get().map(|e| view! {
                <div class="health-error"><span class="status-text status-error">{e}</span></div>
            })}

            <div class="variant-fields">
                <For
                    each=move || fields.get()
                    key=|field| field.name.clone()
                    children={
                        let on_field_change = on_field_change.clone();
                        move |field: ConfigField| {
                            let hints = hints_for_field(&field.name, &field.value);
                            let lookup = field.name.clone();
                            let fallback = field.value.clone();
                            let value = Signal::derive(move || {
                                fields
                                    .with(|fs| fs.iter().find(|f| f.name == lookup).map(|f| f.value.clone()))
                                    .unwrap_or_else(|| fallback.clone())
                            });
                            let name = field.name.clone();
                            let on_change = on_field_change.clone();
                            view! {
                                <PropertyControl
                                    value=value
                                    on_change=move |next| on_change(name.clone(), next)
                                    hints=hints
                                />
                            }
                        }
                    }
                />
                <Show when=move || !loading.get() && schema_error.get().is_none() && fields.with(|f| f.is_empty())>
                    <p class="section-description">"This variant has no configurable parameters."</p>
                </Show>
            </div>

            {move || {
                let ready = !loading.get() && schema_error.get().is_none();
                let uri = variant.with_untracked(|v| v.as_ref().and_then(|v| v.uri.clone()));
                match (ready, uri) {
                    (true, Some(uri)) => Some(view! {
                        <TestView
                            inputs=inputs.get_untracked()
                            options=options
                            uri=uri
                            is_chat=is_chat.get_untracked()
                        />
                    }),
                    _ => None,
                }
            }}
        </div>
    }
}
