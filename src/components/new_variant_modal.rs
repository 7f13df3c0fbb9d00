use leptos::prelude::*;

use crate::playground::variants::template_placeholder;

/// Modal for cloning an existing variant under a new name.
#[component]
pub fn NewVariantModal(
    #[prop(into)] open: Signal<bool>,
    /// Names offered as templates, in tab order.
    #[prop(into)]
    templates: Signal<Vec<String>>,
    /// Validation error from the last create attempt.
    #[prop(into)]
    error: Signal<Option<String>>,
    #[prop(into)] on_close: Callback<()>,
    /// Called with `(template, new_name)`.
    #[prop(into)]
    on_create: Callback<(String, String)>,
) -> impl IntoView {
    let (template, set_template) = signal(String::new());
    let (new_name, set_new_name) = signal(String::new());

    // Default to the first template each time the modal opens
    Effect::new(move |_| {
        if open.get() {
            let first = templates.with_untracked(|t| t.first().cloned()).unwrap_or_default();
            set_template.set(first);
            set_new_name.set(String::new());
        }
    });

    let submit = move |_| {
        on_create.run((template.get_untracked(), new_name.get_untracked()));
    };

    view! {
        <Show when=move || open.get()>
            <div class="modal-overlay" on:click=move |_| on_close.run(())>
                <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                    <h3>"Create a new variant"</h3>

                    <div class="form-group">
                        <label for="variant-template">"Template"</label>
                        <select
                            id="variant-template"
                            class="input"
                            on:change=move |ev| set_template.set(event_target_value(&ev))
                        >
                            <For
                                each=move || templates.get()
                                key=|name| name.clone()
                                children=move |name| {
                                    let current = name.clone();
                                    let value = name.clone();
                                    view! {
                                        <option
                                            value=value
                                            prop:selected=move || template.with(|t| *t == current)
                                        >
                                            {name}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="variant-name">"Variant name"</label>
                        <input
                            id="variant-name"
                            type="text"
                            class="input"
                            placeholder=move || template.with(|t| template_placeholder(t).to_string())
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                    </div>

                    {move || error.get().map(|e| view! { <span class="status-text status-error">{e}</span> })}

                    <div class="modal-actions">
                        <button class="btn" on:click=move |_| on_close.run(())>"Cancel"</button>
                        <button class="btn btn-primary" on:click=submit>"Create"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
