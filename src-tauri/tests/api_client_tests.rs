use mockito::{Matcher, Server};
use serde_json::{json, Map};

use promptdeck_tauri::api::types::{EvaluatorConfigPayload, NewTestsetRequest, NewVariantRequest, VariantSummary};
use promptdeck_tauri::{ApiClient, PromptDeckError};

fn client(server: &Server, key: Option<&str>) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.url()), key.map(str::to_string)).expect("client should build")
}

#[tokio::test]
async fn test_list_variants_sends_api_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/apps/app-1/variants/")
        .match_header("authorization", "ApiKey secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "variant_name": "chat.default",
                    "variant_id": "v-1",
                    "base_id": "b-1",
                    "uri": "http://localhost/chat",
                    "parameters": { "temperature": 0.7 }
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let records = client(&server, Some("secret")).list_variants("app-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 1);
    let summary = VariantSummary::from(records[0].clone());
    assert!(summary.persistent);
    assert_eq!(summary.variant_id.as_deref(), Some("v-1"));
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/apps/")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let apps = client(&server, None).list_apps().await.unwrap();

    mock.assert_async().await;
    assert!(apps.is_empty());
}

#[tokio::test]
async fn test_api_error_keeps_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/variants/v-9/")
        .with_status(404)
        .with_body(r#"{"detail":"Variant not found"}"#)
        .create_async()
        .await;

    let err = client(&server, None).delete_variant("v-9").await.unwrap_err();

    match err {
        PromptDeckError::Api { status, body, .. } => {
            assert_eq!(status, 404);
            assert!(body.contains("Variant not found"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_save_new_variant_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/variants/from-base/")
        .match_body(Matcher::PartialJson(json!({
            "base_id": "b-1",
            "new_variant_name": "chat.experiment",
            "new_config_name": "experiment",
            "parameters": { "temperature": 1.2 }
        })))
        .with_status(200)
        .with_body(json!({ "variant_name": "chat.experiment", "variant_id": "v-2" }).to_string())
        .create_async()
        .await;

    let mut parameters = Map::new();
    parameters.insert("temperature".into(), json!(1.2));
    let request = NewVariantRequest::new("b-1".into(), "chat.experiment".into(), parameters);
    let record = client(&server, None).save_new_variant(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(record.variant_id.as_deref(), Some("v-2"));
}

#[tokio::test]
async fn test_update_parameters_uses_put() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/variants/v-1/parameters/")
        .match_body(Matcher::Json(json!({ "parameters": { "max_tokens": 256 } })))
        .with_status(200)
        .create_async()
        .await;

    let mut parameters = Map::new();
    parameters.insert("max_tokens".into(), json!(256));
    client(&server, None)
        .update_variant_parameters("v-1", parameters)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_posts_to_variant_service() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/app-1/chat/generate")
        .match_body(Matcher::PartialJson(json!({ "country": "France" })))
        .with_status(200)
        .with_body(json!({ "message": "Paris" }).to_string())
        .create_async()
        .await;

    let uri = format!("{}/app-1/chat", server.url());
    let result = client(&server, None)
        .generate(&uri, &json!({ "country": "France", "temperature": 0.2 }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result["message"], json!("Paris"));
}

#[tokio::test]
async fn test_create_evaluator_config_returns_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/evaluators/configs/")
        .match_body(Matcher::PartialJson(json!({
            "app_id": "app-1",
            "name": "strict",
            "evaluator_key": "auto_exact_match"
        })))
        .with_status(200)
        .with_body(json!({ "id": "cfg-1", "name": "strict" }).to_string())
        .create_async()
        .await;

    let payload = EvaluatorConfigPayload {
        name: "strict".into(),
        evaluator_key: "auto_exact_match".into(),
        settings_values: Map::new(),
    };
    let record = client(&server, None)
        .create_evaluator_config("app-1", payload)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(record.id, "cfg-1");
}

#[tokio::test]
async fn test_list_testsets_filters_by_app() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/testsets/")
        .match_query(Matcher::UrlEncoded("app_id".into(), "app-1".into()))
        .with_status(200)
        .with_body(json!([{ "_id": "ts-1", "name": "smoke", "created_at": "2024-05-01" }]).to_string())
        .create_async()
        .await;

    let testsets = client(&server, None).list_testsets("app-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(testsets.len(), 1);
    assert_eq!(testsets[0].id, "ts-1");
    assert_eq!(testsets[0].name, "smoke");
}

#[tokio::test]
async fn test_create_testset_posts_rows() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/testsets/app-1/")
        .match_body(Matcher::Json(json!({
            "name": "capitals",
            "csvdata": [
                { "country": "France", "correct_answer": "Paris" },
                { "country": "Peru", "correct_answer": "Lima" }
            ]
        })))
        .with_status(200)
        .with_body(json!({ "id": "ts-2", "name": "capitals", "created_at": "2024-05-02" }).to_string())
        .create_async()
        .await;

    let row = |country: &str, answer: &str| {
        let mut row = Map::new();
        row.insert("country".into(), json!(country));
        row.insert("correct_answer".into(), json!(answer));
        row
    };
    let request = NewTestsetRequest {
        name: "capitals".into(),
        csvdata: vec![row("France", "Paris"), row("Peru", "Lima")],
    };
    let created = client(&server, None).create_testset("app-1", &request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(created.id, "ts-2");
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/profile/")
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let err = client(&server, None).get_profile().await.unwrap_err();
    assert!(matches!(err, PromptDeckError::Decode { .. }));
}
