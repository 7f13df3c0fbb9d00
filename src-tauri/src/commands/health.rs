use tauri::AppHandle;
use tracing::{info, warn};

use super::config::{api_base_url, api_client};
use super::keychain::{read_api_key, API_KEY_SERVICE};
use crate::api::types::HealthReport;

#[tauri::command]
pub async fn run_health_check(app: AppHandle) -> Result<HealthReport, String> {
    info!("Running health check");

    let api_base_url = api_base_url(&app)?;
    let api_key_set = matches!(read_api_key(API_KEY_SERVICE), Ok(Some(_)));
    info!("API base URL: {}, API key set: {}", api_base_url, api_key_set);

    let probe = match api_client(&app) {
        Ok(client) => client.list_apps().await,
        Err(e) => Err(e),
    };

    let report = match probe {
        Ok(apps) => HealthReport {
            api_base_url,
            api_reachable: true,
            api_key_set,
            app_count: Some(apps.len()),
            error: None,
        },
        Err(e) => {
            warn!("Platform API check failed: {}", e);
            HealthReport {
                api_base_url,
                api_reachable: false,
                api_key_set,
                app_count: None,
                error: Some(e.to_string()),
            }
        }
    };
    Ok(report)
}
