use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::new_variant_modal::NewVariantModal;
use crate::components::removal_warning_modal::RemovalWarningModal;
use crate::components::variant_config::VariantConfig;
use crate::playground::variants::VariantStore;

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Success(String),
    Error(String),
}

/// Tab strip over the variant store, plus the add/remove flows.
///
/// Unsaved variants close locally; saved ones are deleted on the backend
/// first and only then dropped from the store.
#[component]
pub fn VariantTabs(store: RwSignal<VariantStore>) -> impl IntoView {
    let (adding, set_adding) = signal(false);
    let (add_error, set_add_error) = signal::<Option<String>>(None);
    let (closing, set_closing) = signal::<Option<String>>(None);
    let (deleting, set_deleting) = signal::<Option<String>>(None);
    let (delete_loading, set_delete_loading) = signal(false);
    let (notice, set_notice) = signal::<Option<Notice>>(None);

    let names = Signal::derive(move || {
        store.with(|s| s.variants().iter().map(|v| v.variant_name.clone()).collect::<Vec<_>>())
    });
    let active_name = Memo::new(move |_| store.with(|s| s.active_name().map(str::to_string)));

    let create_variant = move |(template, new_name): (String, String)| {
        match store.with_untracked(|s| s.add_variant(&template, &new_name)) {
            Ok(next) => {
                store.set(next);
                set_add_error.set(None);
                set_adding.set(false);
            }
            Err(e) => set_add_error.set(Some(e.to_string())),
        }
    };

    let close_unsaved = move |_| {
        if let Some(name) = closing.get_untracked() {
            store.set(store.with_untracked(|s| s.remove_variant(&name)));
        }
        set_closing.set(None);
    };

    let delete_saved = move |_| {
        let Some(name) = deleting.get_untracked() else {
            return;
        };
        let variant_id = store.with_untracked(|s| s.get(&name).and_then(|v| v.variant_id.clone()));
        set_delete_loading.set(true);
        spawn_local(async move {
            let result = match variant_id {
                Some(id) => commands::delete_variant(&id).await,
                None => Ok(()),
            };
            match result {
                Ok(()) => {
                    store.set(store.with_untracked(|s| s.remove_variant(&name)));
                    set_notice.set(Some(Notice::Success(format!("Variant {} removed", name))));
                }
                Err(e) => {
                    set_notice.set(Some(Notice::Error(format!("Failed to remove variant: {}", e))));
                }
            }
            set_delete_loading.set(false);
            set_deleting.set(None);
        });
    };

    view! {
        <div class="variant-tabs">
            {move || notice.get().map(|n| {
                let (class, text) = match n {
                    Notice::Success(text) => ("notice notice-success", text),
                    Notice::Error(text) => ("notice notice-error", text),
                };
                view! {
                    <div class=class>
                        <span>{text}</span>
                        <button class="btn btn-small" on:click=move |_| set_notice.set(None)>"\u{2717}"</button>
                    </div>
                }
            })}

            <div class="tab-strip">
                <For
                    each=move || names.get()
                    key=|name| name.clone()
                    children=move |name| {
                        let select_name = name.clone();
                        let close_name = name.clone();
                        let closable_name = name.clone();
                        let active_check = name.clone();
                        view! {
                            <div
                                class="tab"
                                class:tab-active=move || active_name.with(|a| a.as_deref() == Some(active_check.as_str()))
                            >
                                <button
                                    class="tab-label"
                                    on:click=move |_| store.set(store.with_untracked(|s| s.select(&select_name)))
                                >
                                    {name}
                                </button>
                                <Show when=move || store.with(|s| s.is_closable(&closable_name))>
                                    <button
                                        class="tab-close"
                                        title="Close"
                                        on:click={
                                            let name = close_name.clone();
                                            move |_| set_closing.set(Some(name.clone()))
                                        }
                                    >
                                        "\u{2717}"
                                    </button>
                                </Show>
                            </div>
                        }
                    }
                />
                <button
                    class="tab tab-add"
                    title="New variant"
                    on:click=move |_| {
                        set_add_error.set(None);
                        set_adding.set(true);
                    }
                >
                    "+"
                </button>
            </div>

            {move || active_name.get().map(|name| {
                let lookup = name.clone();
                let variant = Signal::derive(move || store.with(|s| s.get(&lookup).cloned()));
                view! {
                    <VariantConfig
                        variant=variant
                        on_parameters=move |(name, values): (String, serde_json::Map<String, serde_json::Value>)| {
                            store.set(store.with_untracked(|s| s.update_parameters(&name, values)));
                        }
                        on_persist=move |(name, variant_id): (String, Option<String>)| {
                            store.set(store.with_untracked(|s| s.persist_variant(&name, variant_id)));
                        }
                        on_delete=move |name: String| set_deleting.set(Some(name))
                    />
                }
            })}

            <NewVariantModal
                open=adding
                templates=names
                error=add_error
                on_close=move |_| set_adding.set(false)
                on_create=create_variant
            />

            <RemovalWarningModal
                open=Signal::derive(move || closing.get().is_some())
                message="This variant has not been saved. Closing it discards its changes."
                on_cancel=move |_| set_closing.set(None)
                on_confirm=close_unsaved
            />

            <RemovalWarningModal
                open=Signal::derive(move || deleting.get().is_some())
                message="This variant will be deleted from the backend. This cannot be undone."
                loading=delete_loading
                on_cancel=move |_| set_deleting.set(None)
                on_confirm=delete_saved
            />
        </div>
    }
}
