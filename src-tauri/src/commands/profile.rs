use tauri::AppHandle;
use tracing::info;

use super::config::api_client;
use crate::api::types::{Organization, UserProfile};

#[tauri::command]
pub async fn get_profile(app: AppHandle) -> Result<UserProfile, String> {
    info!("Loading user profile");
    Ok(api_client(&app)?.get_profile().await?)
}

#[tauri::command]
pub async fn list_orgs(app: AppHandle) -> Result<Vec<Organization>, String> {
    info!("Listing organizations");
    Ok(api_client(&app)?.list_organizations().await?)
}
