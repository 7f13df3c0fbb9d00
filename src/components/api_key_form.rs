use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, API_KEY_SERVICE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyState {
    Checking,
    Stored,
    Missing,
}

/// Stores the platform API key in the OS keychain. The key itself is never
/// read back into the page, only whether one is stored.
#[component]
pub fn ApiKeyForm(
    #[prop(into)] label: String,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let (draft, set_draft) = signal(String::new());
    let (key_state, set_key_state) = signal(KeyState::Checking);
    let (busy, set_busy) = signal(false);
    let (error_message, set_error_message) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::get_api_key(API_KEY_SERVICE).await {
                Ok(found) => set_key_state.set(if found.is_some() { KeyState::Stored } else { KeyState::Missing }),
                Err(e) => {
                    set_key_state.set(KeyState::Missing);
                    set_error_message.set(Some(format!("Failed to check key: {}", e)));
                }
            }
        });
    });

    let save_key = move |_| {
        let key = draft.get().trim().to_string();
        if key.is_empty() {
            set_error_message.set(Some("Please enter an API key".to_string()));
            return;
        }
        set_busy.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match commands::set_api_key(API_KEY_SERVICE, &key).await {
                Ok(()) => {
                    set_key_state.set(KeyState::Stored);
                    set_draft.set(String::new());
                }
                Err(e) => set_error_message.set(Some(format!("Failed to save: {}", e))),
            }
            set_busy.set(false);
        });
    };

    let forget_key = move |_| {
        set_busy.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match commands::delete_api_key(API_KEY_SERVICE).await {
                Ok(()) => set_key_state.set(KeyState::Missing),
                Err(e) => set_error_message.set(Some(format!("Failed to delete: {}", e))),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="form-group api-key-form">
            <label>{label}</label>
            <div class="input-row">
                <input
                    type="password"
                    placeholder=placeholder
                    class="input input-password"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    disabled=move || busy.get()
                />
                <button class="btn btn-save" on:click=save_key disabled=move || busy.get()>
                    {move || if busy.get() { "Saving..." } else { "Save" }}
                </button>
                <Show when=move || key_state.get() == KeyState::Stored>
                    <button class="btn btn-delete" on:click=forget_key disabled=move || busy.get()>
                        "Delete"
                    </button>
                </Show>
            </div>
            <div class="key-status-row">
                {move || match (error_message.get(), key_state.get()) {
                    (Some(err), _) => view! { <span class="status-text status-error">{err}</span> }.into_any(),
                    (None, KeyState::Checking) => view! { <span class="status-text">"Checking..."</span> }.into_any(),
                    (None, KeyState::Stored) => view! {
                        <span class="status-text status-saved">"Saved to keychain"</span>
                    }
                    .into_any(),
                    (None, KeyState::Missing) => view! {
                        <span class="status-text status-not-set">"Not configured"</span>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
