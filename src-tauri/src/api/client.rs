use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};
use url::Url;

use super::types::{
    AppSummary, CreateEvaluatorConfigRequest, Evaluator, EvaluatorConfigPayload, EvaluatorConfigRecord,
    NewTestsetRequest, NewVariantRequest, Organization, TestsetSummary, UpdateParametersRequest, UserProfile,
    VariantRecord,
};
use crate::error::PromptDeckError;

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 1024;

/// Client for the platform API rooted at `base`, and for the variant services
/// it points to.
///
/// Only the connection is bounded by a timeout; variant runs may take as long
/// as the model does and are cancelled explicitly instead.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, PromptDeckError> {
        // A trailing slash keeps the last path segment when joining
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base = Url::parse(&normalized).map_err(|e| PromptDeckError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .user_agent("PromptDeck/0.1")
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PromptDeckError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base, api_key })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Absolute URL of a platform path such as `apps/`.
    pub fn endpoint(&self, path: &str) -> Result<Url, PromptDeckError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| PromptDeckError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Absolute URL of a path under a served variant.
    pub fn service_url(uri: &str, path: &str) -> Result<Url, PromptDeckError> {
        let joined = format!("{}/{}", uri.trim().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| PromptDeckError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("ApiKey {}", key)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, PromptDeckError> {
        let response = builder.send().await.map_err(|e| {
            let reason = if e.is_connect() {
                format!("could not connect ({})", e)
            } else {
                e.to_string()
            };
            error!("Request to {} failed: {}", url, reason);
            PromptDeckError::Http {
                url: url.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        let body = truncate(body);
        error!("API error {} from {}: {}", status, url, body);
        Err(PromptDeckError::Api {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, PromptDeckError> {
        let text = response.text().await.map_err(|e| PromptDeckError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| PromptDeckError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PromptDeckError> {
        info!("GET {}", url);
        let response = self.send(self.request(Method::GET, url.clone()), &url).await?;
        Self::decode(response, &url).await
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, PromptDeckError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("{} {}", method, url);
        let response = self.send(self.request(method, url.clone()).json(body), &url).await?;
        Self::decode(response, &url).await
    }

    /// Like [`send_json`](Self::send_json) for endpoints whose body is not used.
    async fn send_ignoring_body<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<(), PromptDeckError>
    where
        B: Serialize + ?Sized,
    {
        info!("{} {}", method, url);
        let builder = self.request(method, url.clone());
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder, &url).await.map(|_| ())
    }

    // -- Apps and variants --

    pub async fn list_apps(&self) -> Result<Vec<AppSummary>, PromptDeckError> {
        self.get_json(self.endpoint("apps/")?).await
    }

    pub async fn list_variants(&self, app_id: &str) -> Result<Vec<VariantRecord>, PromptDeckError> {
        let path = format!("apps/{}/variants/", urlencoding::encode(app_id));
        self.get_json(self.endpoint(&path)?).await
    }

    pub async fn delete_variant(&self, variant_id: &str) -> Result<(), PromptDeckError> {
        let path = format!("variants/{}/", urlencoding::encode(variant_id));
        self.send_ignoring_body::<Value>(Method::DELETE, self.endpoint(&path)?, None)
            .await
    }

    pub async fn save_new_variant(&self, request: &NewVariantRequest) -> Result<VariantRecord, PromptDeckError> {
        self.send_json(Method::POST, self.endpoint("variants/from-base/")?, request)
            .await
    }

    pub async fn update_variant_parameters(
        &self,
        variant_id: &str,
        parameters: Map<String, Value>,
    ) -> Result<(), PromptDeckError> {
        let path = format!("variants/{}/parameters/", urlencoding::encode(variant_id));
        let body = UpdateParametersRequest { parameters };
        self.send_ignoring_body(Method::PUT, self.endpoint(&path)?, Some(&body))
            .await
    }

    // -- Served variants --

    pub async fn fetch_openapi(&self, uri: &str) -> Result<Value, PromptDeckError> {
        self.get_json(Self::service_url(uri, "openapi.json")?).await
    }

    pub async fn generate(&self, uri: &str, body: &Value) -> Result<Value, PromptDeckError> {
        self.send_json(Method::POST, Self::service_url(uri, "generate")?, body)
            .await
    }

    // -- Evaluators --

    pub async fn list_evaluators(&self) -> Result<Vec<Evaluator>, PromptDeckError> {
        self.get_json(self.endpoint("evaluators/")?).await
    }

    pub async fn create_evaluator_config(
        &self,
        app_id: &str,
        payload: EvaluatorConfigPayload,
    ) -> Result<EvaluatorConfigRecord, PromptDeckError> {
        let body = CreateEvaluatorConfigRequest {
            app_id: app_id.to_string(),
            payload,
        };
        self.send_json(Method::POST, self.endpoint("evaluators/configs/")?, &body)
            .await
    }

    pub async fn update_evaluator_config(
        &self,
        config_id: &str,
        payload: &EvaluatorConfigPayload,
    ) -> Result<(), PromptDeckError> {
        let path = format!("evaluators/configs/{}/", urlencoding::encode(config_id));
        self.send_ignoring_body(Method::PUT, self.endpoint(&path)?, Some(payload))
            .await
    }

    // -- Test sets --

    pub async fn list_testsets(&self, app_id: &str) -> Result<Vec<TestsetSummary>, PromptDeckError> {
        let mut url = self.endpoint("testsets/")?;
        url.query_pairs_mut().append_pair("app_id", app_id);
        self.get_json(url).await
    }

    /// Returns the created test set; the platform echoes its id and name.
    pub async fn create_testset(
        &self,
        app_id: &str,
        request: &NewTestsetRequest,
    ) -> Result<TestsetSummary, PromptDeckError> {
        let path = format!("testsets/{}/", urlencoding::encode(app_id));
        self.send_json(Method::POST, self.endpoint(&path)?, request).await
    }

    // -- Profile --

    pub async fn get_profile(&self) -> Result<UserProfile, PromptDeckError> {
        self.get_json(self.endpoint("profile/")?).await
    }

    pub async fn list_organizations(&self) -> Result<Vec<Organization>, PromptDeckError> {
        self.get_json(self.endpoint("organizations/")?).await
    }
}

fn truncate(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("http://localhost/api", None).unwrap();
        assert_eq!(client.endpoint("apps/").unwrap().as_str(), "http://localhost/api/apps/");

        let slashed = ApiClient::new("http://localhost/api/", None).unwrap();
        assert_eq!(
            slashed.endpoint("/variants/v1/").unwrap().as_str(),
            "http://localhost/api/variants/v1/"
        );
    }

    #[test]
    fn test_service_url() {
        assert_eq!(
            ApiClient::service_url("http://localhost/app-1/chat/", "openapi.json")
                .unwrap()
                .as_str(),
            "http://localhost/app-1/chat/openapi.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, PromptDeckError::InvalidUrl { .. }));
    }

    #[test]
    fn test_truncate_long_bodies() {
        assert_eq!(truncate("short".into()), "short");
        let long = "é".repeat(MAX_ERROR_BODY);
        let cut = truncate(long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= MAX_ERROR_BODY + 3);
    }
}
