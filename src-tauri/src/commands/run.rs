use serde_json::Value;
use tauri::{AppHandle, State};
use tracing::info;

use super::config::api_client;
use crate::api::types::RunRequest;
use crate::runs::RunRegistry;

/// Run a variant. The request can be aborted with [`cancel_run`] using the
/// same run id.
#[tauri::command]
pub async fn call_variant(
    app: AppHandle,
    registry: State<'_, RunRegistry>,
    request: RunRequest,
) -> Result<Value, String> {
    let RunRequest { run_id, uri, body } = request;
    info!("Starting run {} against {}", run_id, uri);
    let client = api_client(&app)?;
    let result = registry
        .track(run_id, async move { client.generate(&uri, &body).await })
        .await?;
    info!("Run {} finished", run_id);
    Ok(result)
}

#[tauri::command]
pub fn cancel_run(registry: State<'_, RunRegistry>, run_id: u64) -> Result<bool, String> {
    let cancelled = registry.cancel(run_id);
    info!("Cancel run {}: {}", run_id, if cancelled { "aborted" } else { "not running" });
    Ok(cancelled)
}
