use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::api_key_form::ApiKeyForm;
use crate::profile::use_profile;
use crate::theme::{Theme, ThemeContext, THEME_KEY};

const API_BASE_URL_KEY: &str = "api_base_url";

#[component]
pub fn SettingsPage() -> impl IntoView {
    let ThemeContext { theme, set_theme } = expect_context::<ThemeContext>();
    let profile = use_profile();

    let (base_url, set_base_url) = signal(String::new());
    let (url_status, set_url_status) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::get_preference(API_BASE_URL_KEY).await {
                Ok(Some(url)) => set_base_url.set(url),
                Ok(None) => {}
                Err(e) => set_url_status.set(Some(format!("Failed to load preference: {}", e))),
            }
        });
    });

    let save_base_url = move |_| {
        let url = base_url.get().trim().to_string();
        spawn_local(async move {
            match commands::set_preference(API_BASE_URL_KEY, &url).await {
                Ok(()) => {
                    set_url_status.set(Some("Saved".to_string()));
                    // Profile and orgs live on the platform that was just switched to
                    profile.reset();
                    profile.refetch();
                }
                Err(e) => set_url_status.set(Some(format!("Failed to save: {}", e))),
            }
        });
    };

    let change_theme = move |ev: leptos::ev::Event| {
        let chosen = Theme::parse(&event_target_value(&ev));
        set_theme.set(chosen);
        spawn_local(async move {
            if let Err(e) = commands::set_preference(THEME_KEY, chosen.as_str()).await {
                web_sys::console::error_1(&format!("Failed to save theme: {}", e).into());
            }
        });
    };

    view! {
        <div class="page settings-page">
            <h2>"Settings"</h2>

            <section class="settings-section">
                <h3>"Platform"</h3>
                <p class="section-description">
                    "Where apps, variants and evaluators are served from. Leave empty for the local default."
                </p>

                <div class="form-group">
                    <label for="api-base-url">"API base URL"</label>
                    <div class="input-row">
                        <input
                            id="api-base-url"
                            type="text"
                            placeholder="http://localhost/api"
                            class="input"
                            prop:value=move || base_url.get()
                            on:input=move |ev| set_base_url.set(event_target_value(&ev))
                        />
                        <button class="btn btn-save" on:click=save_base_url>"Save"</button>
                    </div>
                    <Show when=move || url_status.get().is_some()>
                        <span class="status-text">{move || url_status.get().unwrap_or_default()}</span>
                    </Show>
                </div>

                <ApiKeyForm label="API Key" placeholder="Paste your platform API key" />
            </section>

            <section class="settings-section">
                <h3>"Appearance"</h3>
                <div class="form-group">
                    <label for="theme">"Theme"</label>
                    <select id="theme" class="input" on:change=change_theme>
                        {Theme::ALL
                            .into_iter()
                            .map(|t| view! {
                                <option value=t.as_str() selected=move || theme.get() == t>{t.label()}</option>
                            })
                            .collect_view()}
                    </select>
                </div>
            </section>
        </div>
    }
}
