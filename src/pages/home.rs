use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, AppSummary};

#[component]
pub fn HomePage() -> impl IntoView {
    let (apps, set_apps) = signal::<Vec<AppSummary>>(Vec::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_apps().await {
                Ok(list) => set_apps.set(list),
                Err(e) => set_error.set(Some(format!("Failed to load apps: {}", e))),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="page home-page">
            <h2>"Apps"</h2>
            <p class="page-description">
                "Pick an app to tune its variants, review them side by side, build test sets or configure evaluators."
            </p>

            <Show when=move || loading.get()>
                <p class="loading">"Loading apps..."</p>
            </Show>

            {move || error.get().map(|e| view! {
                <div class="health-error"><span class="status-text status-error">{e}</span></div>
            })}

            <Show when=move || !loading.get() && error.get().is_none() && apps.with(|a| a.is_empty())>
                <p class="section-description">
                    "No apps yet. Serve one with the platform CLI, then refresh this page."
                </p>
            </Show>

            <div class="card-grid">
                <For
                    each=move || apps.get()
                    key=|app| app.app_id.clone()
                    children=move |app| {
                        view! {
                            <div class="card">
                                <h3>{app.app_name.clone()}</h3>
                                <div class="card-actions">
                                    <a href=format!("/apps/{}/playground", app.app_id) class="btn btn-primary">"Playground"</a>
                                    <a href=format!("/apps/{}/overview", app.app_id) class="btn">"Overview"</a>
                                    <a href=format!("/apps/{}/evaluators", app.app_id) class="btn">"Evaluators"</a>
                                    <a href=format!("/apps/{}/testsets", app.app_id) class="btn">"Test sets"</a>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
