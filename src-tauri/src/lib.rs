pub mod api;
mod commands;
pub mod error;
pub mod runs;

pub use api::ApiClient;
pub use error::PromptDeckError;
pub use runs::RunRegistry;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(RunRegistry::default())
        .invoke_handler(tauri::generate_handler![
            commands::keychain::set_api_key,
            commands::keychain::get_api_key,
            commands::keychain::delete_api_key,
            commands::config::get_preference,
            commands::config::set_preference,
            commands::health::run_health_check,
            commands::variants::list_apps,
            commands::variants::list_variants,
            commands::variants::delete_variant,
            commands::variants::save_new_variant,
            commands::variants::update_variant_parameters,
            commands::schema::fetch_openapi_schema,
            commands::run::call_variant,
            commands::run::cancel_run,
            commands::evaluators::list_evaluators,
            commands::evaluators::create_evaluator_config,
            commands::evaluators::update_evaluator_config,
            commands::testsets::list_testsets,
            commands::testsets::create_testset,
            commands::profile::get_profile,
            commands::profile::list_orgs,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
