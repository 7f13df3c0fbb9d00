use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::variant_tabs::VariantTabs;
use crate::pages::{use_app_id, use_variant_query};
use crate::playground::variants::VariantStore;

#[component]
pub fn PlaygroundPage() -> impl IntoView {
    let app_id = use_app_id();
    let requested = use_variant_query();
    let store = RwSignal::new(VariantStore::default());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);

    // Reload whenever the route points at another app or variant
    Effect::new(move |_| {
        let id = app_id.get();
        let preferred = requested.get();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::list_variants(&id).await {
                Ok(records) => {
                    let loaded = VariantStore::from_records(records);
                    store.set(match preferred {
                        Some(name) => loaded.select(&name),
                        None => loaded,
                    });
                }
                Err(e) => set_error.set(Some(format!("Failed to load variants: {}", e))),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="page playground-page">
            <h2>"Playground"</h2>

            <Show when=move || loading.get()>
                <p class="loading">"Loading variants..."</p>
            </Show>

            {move || error.get().map(|e| view! {
                <div class="health-error"><span class="status-text status-error">{e}</span></div>
            })}

            <Show when=move || !loading.get() && error.get().is_none()>
                <VariantTabs store=store />
            </Show>
        </div>
    }
}
