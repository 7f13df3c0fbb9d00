use serde_json::Value;
use tauri::AppHandle;
use tracing::info;

use super::config::api_client;

/// OpenAPI document of a served variant.
#[tauri::command]
pub async fn fetch_openapi_schema(app: AppHandle, uri: String) -> Result<Value, String> {
    info!("Fetching OpenAPI schema from {}", uri);
    Ok(api_client(&app)?.fetch_openapi(&uri).await?)
}
