use serde_json::{Map, Value};
use tauri::AppHandle;
use tracing::info;

use super::config::api_client;
use crate::api::types::{NewTestsetRequest, TestsetSummary};

#[tauri::command]
pub async fn list_testsets(app: AppHandle, app_id: String) -> Result<Vec<TestsetSummary>, String> {
    info!("Listing test sets of app {}", app_id);
    Ok(api_client(&app)?.list_testsets(&app_id).await?)
}

/// Save a test set built in the editor; returns the created entry.
#[tauri::command]
pub async fn create_testset(
    app: AppHandle,
    app_id: String,
    name: String,
    rows: Vec<Map<String, Value>>,
) -> Result<TestsetSummary, String> {
    info!("Creating test set {} with {} rows for app {}", name, rows.len(), app_id);
    let request = NewTestsetRequest { name, csvdata: rows };
    Ok(api_client(&app)?.create_testset(&app_id, &request).await?)
}
