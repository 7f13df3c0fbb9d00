use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

use crate::evaluators::{Evaluator, EvaluatorConfigPayload};
use crate::playground::parameter::Parameter;
use crate::playground::run::{build_request_body, ChatMessage, RunTicket};
use crate::playground::variants::Variant;
use crate::profile::{Org, User};
use crate::testsets::TestsetSummary;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

/// Keychain service holding the platform API key.
pub const API_KEY_SERVICE: &str = "promptdeck-api";

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| "Unknown error".to_string())
}

/// Invoke a backend command. Arguments are serialized JSON-compatible so that
/// nested maps reach the backend as plain objects.
async fn call<A, R>(cmd: &str, args: &A) -> Result<R, String>
where
    A: Serialize,
    R: DeserializeOwned,
{
    let args = args
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())?;

    let result = invoke(cmd, args).await.map_err(js_error)?;

    serde_wasm_bindgen::from_value(result).map_err(|e| format!("Failed to parse response: {}", e))
}

// -- Arg structs for serialization --

#[derive(Serialize)]
struct NoArgs {}

#[derive(Serialize)]
struct ServiceArgs<'a> {
    service: &'a str,
}

#[derive(Serialize)]
struct SetApiKeyArgs<'a> {
    service: &'a str,
    key: &'a str,
}

#[derive(Serialize)]
struct GetPreferenceArgs<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct SetPreferenceArgs<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppArgs<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantIdArgs<'a> {
    variant_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveNewVariantArgs<'a> {
    base_id: &'a str,
    variant_name: &'a str,
    parameters: &'a Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParametersArgs<'a> {
    variant_id: &'a str,
    parameters: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct SchemaArgs<'a> {
    uri: &'a str,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    run_id: u64,
    uri: &'a str,
    body: Value,
}

#[derive(Serialize)]
struct CallVariantArgs<'a> {
    request: RunRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelRunArgs {
    run_id: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEvaluatorConfigArgs<'a> {
    app_id: &'a str,
    payload: &'a EvaluatorConfigPayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEvaluatorConfigArgs<'a> {
    config_id: &'a str,
    payload: &'a EvaluatorConfigPayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTestsetArgs<'a> {
    app_id: &'a str,
    name: &'a str,
    rows: &'a [Map<String, Value>],
}

// -- Types matching backend structs --

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthReport {
    pub api_base_url: String,
    pub api_reachable: bool,
    pub api_key_set: bool,
    pub app_count: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppSummary {
    pub app_id: String,
    pub app_name: String,
}

// -- Keychain and preferences --

pub async fn set_api_key(service: &str, key: &str) -> Result<(), String> {
    call("set_api_key", &SetApiKeyArgs { service, key }).await
}

pub async fn get_api_key(service: &str) -> Result<Option<String>, String> {
    call("get_api_key", &ServiceArgs { service }).await
}

pub async fn delete_api_key(service: &str) -> Result<(), String> {
    call("delete_api_key", &ServiceArgs { service }).await
}

pub async fn get_preference(key: &str) -> Result<Option<String>, String> {
    call("get_preference", &GetPreferenceArgs { key }).await
}

pub async fn set_preference(key: &str, value: &str) -> Result<(), String> {
    call("set_preference", &SetPreferenceArgs { key, value }).await
}

pub async fn run_health_check() -> Result<HealthReport, String> {
    call("run_health_check", &NoArgs {}).await
}

// -- Apps and variants --

pub async fn list_apps() -> Result<Vec<AppSummary>, String> {
    call("list_apps", &NoArgs {}).await
}

/// All saved variants of an app.
pub async fn list_variants(app_id: &str) -> Result<Vec<Variant>, String> {
    call("list_variants", &AppArgs { app_id }).await
}

pub async fn delete_variant(variant_id: &str) -> Result<(), String> {
    call("delete_variant", &VariantIdArgs { variant_id }).await
}

/// Save a variant created in the playground for the first time.
pub async fn save_new_variant(
    base_id: &str,
    variant_name: &str,
    parameters: &Map<String, Value>,
) -> Result<Variant, String> {
    call(
        "save_new_variant",
        &SaveNewVariantArgs {
            base_id,
            variant_name,
            parameters,
        },
    )
    .await
}

pub async fn update_variant_parameters(variant_id: &str, parameters: &Map<String, Value>) -> Result<(), String> {
    call("update_variant_parameters", &UpdateParametersArgs { variant_id, parameters }).await
}

pub async fn fetch_openapi_schema(uri: &str) -> Result<Value, String> {
    call("fetch_openapi_schema", &SchemaArgs { uri }).await
}

// -- Runs --

/// Run a variant. The request is registered under `ticket` so that
/// [`cancel_run`] can abort it.
pub async fn call_variant(
    ticket: RunTicket,
    inputs: &Map<String, Value>,
    input_params: &[Parameter],
    options: &Map<String, Value>,
    uri: &str,
    chat_history: &[ChatMessage],
) -> Result<Value, String> {
    let request = RunRequest {
        run_id: ticket.id(),
        uri,
        body: build_request_body(inputs, input_params, options, chat_history),
    };
    call("call_variant", &CallVariantArgs { request }).await
}

pub async fn cancel_run(ticket: RunTicket) -> Result<bool, String> {
    call("cancel_run", &CancelRunArgs { run_id: ticket.id() }).await
}

// -- Evaluators --

pub async fn list_evaluators() -> Result<Vec<Evaluator>, String> {
    call("list_evaluators", &NoArgs {}).await
}

/// Create a config; returns its id so later saves can update it.
pub async fn create_evaluator_config(app_id: &str, payload: &EvaluatorConfigPayload) -> Result<String, String> {
    call("create_evaluator_config", &CreateEvaluatorConfigArgs { app_id, payload }).await
}

pub async fn update_evaluator_config(config_id: &str, payload: &EvaluatorConfigPayload) -> Result<(), String> {
    call("update_evaluator_config", &UpdateEvaluatorConfigArgs { config_id, payload }).await
}

// -- Test sets --

pub async fn list_testsets(app_id: &str) -> Result<Vec<TestsetSummary>, String> {
    call("list_testsets", &AppArgs { app_id }).await
}

pub async fn create_testset(app_id: &str, name: &str, rows: &[Map<String, Value>]) -> Result<TestsetSummary, String> {
    call("create_testset", &CreateTestsetArgs { app_id, name, rows }).await
}

// -- Profile --

pub async fn get_profile() -> Result<User, String> {
    call("get_profile", &NoArgs {}).await
}

pub async fn list_orgs() -> Result<Vec<Org>, String> {
    call("list_orgs", &NoArgs {}).await
}
