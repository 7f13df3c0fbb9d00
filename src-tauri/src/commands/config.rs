use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{info, warn};

use super::keychain::{read_api_key, API_KEY_SERVICE};
use crate::api::ApiClient;
use crate::error::PromptDeckError;

pub const PREFERENCES_STORE: &str = "preferences.json";
pub const API_BASE_URL_KEY: &str = "api_base_url";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost/api";
/// Overrides the stored base URL when set.
pub const API_BASE_URL_ENV: &str = "PROMPTDECK_API_URL";

fn stored_preference(app: &AppHandle, key: &str) -> Result<Option<String>, PromptDeckError> {
    let store = app.store(PREFERENCES_STORE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        PromptDeckError::Config(e.to_string())
    })?;
    Ok(store.get(key).and_then(|v| v.as_str().map(|s| s.to_string())))
}

/// Environment first, then the stored preference, then the local default.
/// Blank values count as unset.
pub fn resolve_base_url(env: Option<String>, stored: Option<String>) -> String {
    [env, stored]
        .into_iter()
        .flatten()
        .map(|url| url.trim().to_string())
        .find(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn api_base_url(app: &AppHandle) -> Result<String, PromptDeckError> {
    let env = std::env::var(API_BASE_URL_ENV).ok();
    Ok(resolve_base_url(env, stored_preference(app, API_BASE_URL_KEY)?))
}

/// Client for the configured platform, authenticated when a key is stored.
pub fn api_client(app: &AppHandle) -> Result<ApiClient, PromptDeckError> {
    let base_url = api_base_url(app)?;
    let api_key = read_api_key(API_KEY_SERVICE)?;
    ApiClient::new(&base_url, api_key)
}

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    Ok(stored_preference(&app, key)?)
}

#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {} = {}", key, value);
    let store = app.store(PREFERENCES_STORE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        PromptDeckError::Config(e.to_string())
    })?;
    store.set(key, serde_json::json!(value));
    store.save().map_err(|e| {
        warn!("Failed to save store: {}", e);
        PromptDeckError::Config(e.to_string()).into()
    })
}
