use serde_json::{Map, Value};
use tauri::AppHandle;
use tracing::info;

use super::config::api_client;
use crate::api::types::{AppSummary, NewVariantRequest, VariantSummary};

#[tauri::command]
pub async fn list_apps(app: AppHandle) -> Result<Vec<AppSummary>, String> {
    info!("Listing apps");
    Ok(api_client(&app)?.list_apps().await?)
}

#[tauri::command]
pub async fn list_variants(app: AppHandle, app_id: String) -> Result<Vec<VariantSummary>, String> {
    info!("Listing variants of app {}", app_id);
    let records = api_client(&app)?.list_variants(&app_id).await?;
    info!("Found {} variants", records.len());
    Ok(records.into_iter().map(VariantSummary::from).collect())
}

#[tauri::command]
pub async fn delete_variant(app: AppHandle, variant_id: String) -> Result<(), String> {
    info!("Deleting variant {}", variant_id);
    Ok(api_client(&app)?.delete_variant(&variant_id).await?)
}

/// First save of a playground variant, created from its template's base.
#[tauri::command]
pub async fn save_new_variant(
    app: AppHandle,
    base_id: String,
    variant_name: String,
    parameters: Map<String, Value>,
) -> Result<VariantSummary, String> {
    info!("Saving new variant {} from base {}", variant_name, base_id);
    let request = NewVariantRequest::new(base_id, variant_name.clone(), parameters);
    let record = api_client(&app)?.save_new_variant(&request).await?;
    let mut summary = VariantSummary::from(record);
    // Some platform versions answer without echoing the name
    if summary.variant_name.is_empty() {
        summary.variant_name = variant_name;
    }
    Ok(summary)
}

#[tauri::command]
pub async fn update_variant_parameters(
    app: AppHandle,
    variant_id: String,
    parameters: Map<String, Value>,
) -> Result<(), String> {
    info!("Updating parameters of variant {}", variant_id);
    Ok(api_client(&app)?
        .update_variant_parameters(&variant_id, parameters)
        .await?)
}
