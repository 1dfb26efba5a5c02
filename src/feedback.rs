//! @ai:module:intent Forward user feedback about a model to its provider
//! @ai:module:layer infrastructure
//! @ai:module:public_api FeedbackClientTrait, FeedbackClient, MockFeedbackClient
//! @ai:module:stateless false

use crate::config::FeedbackConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{error, info};

/// @ai:intent Trait for the feedback upstream
#[async_trait]
pub trait FeedbackClientTrait: Send + Sync {
    /// @ai:intent Deliver feedback for one model
    /// @ai:post Ok(false) when the provider answered with a non-success status
    async fn send(&self, model: &str, feedback: &Value) -> Result<bool>;
}

#[derive(Debug, Serialize)]
struct FeedbackBody<'a> {
    feedback: &'a Value,
}

/// @ai:intent HTTP client posting to `<base_url>/models/<model>/feedback`
pub struct FeedbackClient {
    client: reqwest::Client,
    base_url: Url,
}

impl FeedbackClient {
    /// @ai:intent Create a client for the configured provider
    /// @ai:effects pure
    pub fn new(config: &FeedbackConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid feedback base_url '{}'", config.base_url))?;

        Ok(Self { client, base_url })
    }

    /// @ai:intent Endpoint for one model
    /// @ai:post the model name is one escaped path segment
    /// @ai:effects pure
    pub fn endpoint(&self, model: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("feedback base_url cannot carry a path"))?
            .pop_if_empty()
            .push("models")
            .push(model)
            .push("feedback");
        Ok(url)
    }
}

#[async_trait]
impl FeedbackClientTrait for FeedbackClient {
    /// @ai:effects network
    async fn send(&self, model: &str, feedback: &Value) -> Result<bool> {
        let response = self
            .client
            .post(self.endpoint(model)?)
            .json(&FeedbackBody { feedback })
            .send()
            .await
            .context("Feedback sending error")?;

        let status = response.status();
        if status.is_success() {
            info!(model, "Feedback sent successfully");
            Ok(true)
        } else {
            error!(model, %status, "Failed to send feedback");
            Ok(false)
        }
    }
}

/// @ai:intent Mock client for testing
#[derive(Default)]
pub struct MockFeedbackClient {
    accept: bool,
    sent: Mutex<Vec<(String, Value)>>,
}

impl MockFeedbackClient {
    /// @ai:intent Create a mock that reports the given delivery outcome
    /// @ai:effects pure
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Feedback received so far
    /// @ai:effects pure
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackClientTrait for MockFeedbackClient {
    async fn send(&self, model: &str, feedback: &Value) -> Result<bool> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((model.to_string(), feedback.clone()));
        }
        Ok(self.accept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_layout() {
        let client = FeedbackClient::new(&FeedbackConfig {
            base_url: "https://provider.test/".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.endpoint("gpt-x").unwrap().as_str(),
            "https://provider.test/models/gpt-x/feedback"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = FeedbackClient::new(&FeedbackConfig {
            base_url: "https://provider.test/api".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.endpoint("gpt-x").unwrap().path(),
            "/api/models/gpt-x/feedback"
        );
    }

    #[test]
    fn test_model_name_cannot_change_route() {
        let client = FeedbackClient::new(&FeedbackConfig {
            base_url: "https://provider.test/".to_string(),
        })
        .unwrap();

        let url = client.endpoint("../admin?x=1").unwrap();

        assert!(url.path().starts_with("/models/"));
        assert!(url.path().ends_with("/feedback"));
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(FeedbackClient::new(&FeedbackConfig {
            base_url: "not a url".to_string(),
        })
        .is_err());
    }

    #[test]
    fn test_body_wraps_feedback() {
        let feedback = json!({"rating": 3});
        let body = serde_json::to_value(FeedbackBody { feedback: &feedback }).unwrap();

        assert_eq!(body, json!({"feedback": {"rating": 3}}));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let client = FeedbackClient::new(&FeedbackConfig {
            base_url: "http://127.0.0.1:1".to_string(),
        })
        .unwrap();

        assert!(client.send("m", &json!("good")).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_records_feedback() {
        let client = MockFeedbackClient::new(true);

        assert!(client.send("m", &json!("good")).await.unwrap());
        assert_eq!(client.sent(), vec![("m".to_string(), json!("good"))]);
    }
}
