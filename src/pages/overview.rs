use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::removal_warning_modal::RemovalWarningModal;
use crate::pages::{playground_href, use_app_id};
use crate::playground::variants::{Variant, VariantStore};

#[component]
pub fn OverviewPage() -> impl IntoView {
    let app_id = use_app_id();
    let store = RwSignal::new(VariantStore::default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (deleting, set_deleting) = signal::<Option<Variant>>(None);
    let (delete_loading, set_delete_loading) = signal(false);

    Effect::new(move |_| {
        let id = app_id.get();
        spawn_local(async move {
            match commands::list_variants(&id).await {
                Ok(records) => store.set(VariantStore::from_records(records)),
                Err(e) => set_error.set(Some(format!("Failed to load variants: {}", e))),
            }
        });
    });

    let confirm_delete = move |_| {
        let Some(variant) = deleting.get_untracked() else {
            return;
        };
        set_delete_loading.set(true);
        spawn_local(async move {
            let result = match variant.variant_id.as_deref() {
                Some(id) => commands::delete_variant(id).await,
                None => Ok(()),
            };
            match result {
                Ok(()) => {
                    store.set(store.with_untracked(|s| s.remove_variant(&variant.variant_name)));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(format!("Failed to remove variant: {}", e))),
            }
            set_delete_loading.set(false);
            set_deleting.set(None);
        });
    };

    view! {
        <div class="page overview-page">
            <h2>"Overview"</h2>
            <p class="page-description">
                <a href=move || playground_href(&app_id.get(), None)>"Open in playground"</a>
            </p>

            {move || error.get().map(|e| view! {
                <div class="health-error"><span class="status-text status-error">{e}</span></div>
            })}

            <table class="variants-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Template"</th>
                        <th>"Saved"</th>
                        <th>"Parameters"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || store.with(|s| s.variants().to_vec())
                        key=|v| v.variant_name.clone()
                        children=move |v| {
                            let origin = v.template_variant_name.clone().unwrap_or_else(|| "-".to_string());
                            let href = playground_href(&app_id.get_untracked(), Some(&v.variant_name));
                            let saved = v.persistent;
                            let target = v.clone();
                            view! {
                                <tr>
                                    <td>{v.variant_name.clone()}</td>
                                    <td>{origin}</td>
                                    <td>{if saved { "Yes" } else { "No" }}</td>
                                    <td>{v.parameters.len()}</td>
                                    <td class="row-actions">
                                        <a href=href class="btn btn-small">"Open in playground"</a>
                                        <Show when=move || saved>
                                            <button
                                                class="btn btn-small btn-delete"
                                                on:click={
                                                    let target = target.clone();
                                                    move |_| set_deleting.set(Some(target.clone()))
                                                }
                                            >
                                                "Delete"
                                            </button>
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <RemovalWarningModal
                open=Signal::derive(move || deleting.get().is_some())
                message="This variant will be deleted from the backend. This cannot be undone."
                loading=delete_loading
                on_cancel=move |_| set_deleting.set(None)
                on_confirm=confirm_delete
            />
        </div>
    }
}
