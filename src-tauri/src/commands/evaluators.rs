use tauri::AppHandle;
use tracing::info;

use super::config::api_client;
use crate::api::types::{Evaluator, EvaluatorConfigPayload};

#[tauri::command]
pub async fn list_evaluators(app: AppHandle) -> Result<Vec<Evaluator>, String> {
    info!("Listing evaluators");
    Ok(api_client(&app)?.list_evaluators().await?)
}

/// Returns the id of the created config.
#[tauri::command]
pub async fn create_evaluator_config(
    app: AppHandle,
    app_id: String,
    payload: EvaluatorConfigPayload,
) -> Result<String, String> {
    info!("Creating evaluator config {} ({}) for app {}", payload.name, payload.evaluator_key, app_id);
    let record = api_client(&app)?.create_evaluator_config(&app_id, payload).await?;
    Ok(record.id)
}

#[tauri::command]
pub async fn update_evaluator_config(
    app: AppHandle,
    config_id: String,
    payload: EvaluatorConfigPayload,
) -> Result<(), String> {
    info!("Updating evaluator config {}", config_id);
    Ok(api_client(&app)?
        .update_evaluator_config(&config_id, &payload)
        .await?)
}
