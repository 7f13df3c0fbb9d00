use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    pub app_id: String,
    pub app_name: String,
}

/// A variant as the platform returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantRecord {
    #[serde(default)]
    pub variant_name: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

/// A variant as the playground consumes it. Everything fetched from the
/// platform is already saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSummary {
    pub variant_name: String,
    pub template_variant_name: Option<String>,
    pub persistent: bool,
    pub parameters: Map<String, Value>,
    pub variant_id: Option<String>,
    pub base_id: Option<String>,
    pub uri: Option<String>,
}

impl From<VariantRecord> for VariantSummary {
    fn from(record: VariantRecord) -> Self {
        Self {
            variant_name: record.variant_name,
            template_variant_name: None,
            persistent: true,
            parameters: record.parameters.unwrap_or_default(),
            variant_id: record.variant_id,
            base_id: record.base_id,
            uri: record.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVariantRequest {
    pub base_id: String,
    pub new_variant_name: String,
    pub new_config_name: String,
    pub parameters: Map<String, Value>,
}

impl NewVariantRequest {
    /// The config name is the part of `app.config` after the app prefix.
    pub fn new(base_id: String, variant_name: String, parameters: Map<String, Value>) -> Self {
        let new_config_name = variant_name
            .split_once('.')
            .map(|(_, config)| config.to_string())
            .unwrap_or_else(|| variant_name.clone());
        Self {
            base_id,
            new_variant_name: variant_name,
            new_config_name,
            parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateParametersRequest {
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluator {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub settings_template: Map<String, Value>,
}

/// Body of an evaluator config save, as sent by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfigPayload {
    pub name: String,
    pub evaluator_key: String,
    #[serde(default)]
    pub settings_values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateEvaluatorConfigRequest {
    pub app_id: String,
    #[serde(flatten)]
    pub payload: EvaluatorConfigPayload,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluatorConfigRecord {
    #[serde(alias = "_id")]
    pub id: String,
}

/// A saved test set as listed by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsetSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of a test set creation: one JSON object per row, keyed by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTestsetRequest {
    pub name: String,
    pub csvdata: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// A variant run registered under the front-end's ticket id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunRequest {
    pub run_id: u64,
    pub uri: String,
    pub body: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub api_base_url: String,
    pub api_reachable: bool,
    pub api_key_set: bool,
    pub app_count: Option<usize>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_record_becomes_saved_summary() {
        let record: VariantRecord = serde_json::from_value(json!({
            "app_id": "app-1",
            "variant_name": "chat.default",
            "variant_id": "v-1",
            "base_id": "b-1",
            "uri": "http://localhost/chat",
            "parameters": { "temperature": 0.7 }
        }))
        .unwrap();
        let summary = VariantSummary::from(record);
        assert!(summary.persistent);
        assert_eq!(summary.template_variant_name, None);
        assert_eq!(summary.parameters["temperature"], json!(0.7));
    }

    #[test]
    fn test_variant_record_without_parameters() {
        let record: VariantRecord = serde_json::from_value(json!({ "variant_name": "x.y", "parameters": null })).unwrap();
        assert!(VariantSummary::from(record).parameters.is_empty());
    }

    #[test]
    fn test_new_variant_config_name() {
        let req = NewVariantRequest::new("b-1".into(), "chat.experiment".into(), Map::new());
        assert_eq!(req.new_config_name, "experiment");
        let bare = NewVariantRequest::new("b-1".into(), "solo".into(), Map::new());
        assert_eq!(bare.new_config_name, "solo");
    }

    #[test]
    fn test_create_config_request_is_flat() {
        let req = CreateEvaluatorConfigRequest {
            app_id: "app-1".into(),
            payload: EvaluatorConfigPayload {
                name: "strict".into(),
                evaluator_key: "auto_exact_match".into(),
                settings_values: Map::new(),
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["app_id"], json!("app-1"));
        assert_eq!(value["evaluator_key"], json!("auto_exact_match"));
    }

    #[test]
    fn test_testset_summary_accepts_mongo_id() {
        let summary: TestsetSummary =
            serde_json::from_value(json!({ "_id": "ts-1", "name": "smoke", "created_at": "2024-05-01" })).unwrap();
        assert_eq!(summary.id, "ts-1");
        assert_eq!(summary.created_at.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_profile_ignores_extra_fields() {
        let user: UserProfile =
            serde_json::from_value(json!({ "id": "u-1", "uid": "auth0|1", "username": "ada" })).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email, None);
    }
}
