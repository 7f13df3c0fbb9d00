use keyring::Entry;
use tracing::{info, warn};

use crate::error::PromptDeckError;

/// Keychain service holding the platform API key.
pub const API_KEY_SERVICE: &str = "promptdeck-api";

const KEYRING_USER: &str = "promptdeck";

fn entry(service: &str) -> Result<Entry, PromptDeckError> {
    Entry::new(service, KEYRING_USER).map_err(|e| {
        warn!("Failed to create keyring entry for {}: {}", service, e);
        PromptDeckError::Keychain(e.to_string())
    })
}

/// The stored key for `service`, `None` when nothing is stored.
pub fn read_api_key(service: &str) -> Result<Option<String>, PromptDeckError> {
    match entry(service)?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => {
            warn!("Failed to get password for {}: {}", service, e);
            Err(PromptDeckError::Keychain(e.to_string()))
        }
    }
}

#[tauri::command]
pub fn set_api_key(service: &str, key: &str) -> Result<(), String> {
    info!("Setting API key for service: {}", service);
    entry(service)?.set_password(key).map_err(|e| {
        warn!("Failed to set password for {}: {}", service, e);
        PromptDeckError::Keychain(e.to_string()).into()
    })
}

#[tauri::command]
pub fn get_api_key(service: &str) -> Result<Option<String>, String> {
    info!("Getting API key for service: {}", service);
    let key = read_api_key(service)?;
    if key.is_none() {
        info!("No API key found for service: {}", service);
    }
    Ok(key)
}

#[tauri::command]
pub fn delete_api_key(service: &str) -> Result<(), String> {
    info!("Deleting API key for service: {}", service);
    match entry(service)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => {
            warn!("Failed to delete credential for {}: {}", service, e);
            Err(PromptDeckError::Keychain(e.to_string()).into())
        }
    }
}
