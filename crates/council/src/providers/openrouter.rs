use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::base::ModelCaller;
use super::configs::OpenRouterProviderConfig;
use super::retry::RetryReason;
use super::utils::{messages_to_openai_spec, openai_response_to_message, truncate_detail};
use crate::errors::{CallError, CallResult};
use crate::models::message::Message;
use crate::models::outcome::CallOutcome;

/// How a single attempt went wrong
enum AttemptError {
    Retryable { reason: RetryReason, detail: String },
    Fatal(CallError),
}

impl AttemptError {
    fn transport(err: reqwest::Error) -> Self {
        AttemptError::Retryable {
            reason: RetryReason::Transport,
            detail: err.to_string(),
        }
    }
}

pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterProviderConfig,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterProviderConfig) -> Result<Self> {
        // Timeouts are applied per attempt, not on the shared client
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenRouterProviderConfig {
        &self.config
    }

    async fn post(
        &self,
        api_key: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<Message, AttemptError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(AttemptError::transport)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let body = response.text().await.unwrap_or_default();
                Err(AttemptError::Retryable {
                    reason: RetryReason::RateLimited,
                    detail: format!(
                        "{}: {}",
                        StatusCode::TOO_MANY_REQUESTS,
                        truncate_detail(&body)
                    ),
                })
            }
            status if status.is_success() => {
                let body = response.bytes().await.map_err(AttemptError::transport)?;
                openai_response_to_message(&body).map_err(AttemptError::Fatal)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AttemptError::Fatal(CallError::Upstream {
                    status: status.as_u16(),
                    detail: truncate_detail(&body),
                }))
            }
        }
    }

    /// Run the full attempt sequence for one model, including backoff waits
    pub async fn complete(
        &self,
        model: &str,
        conversation: &[Message],
        timeout: Duration,
    ) -> CallResult<Message> {
        if model.trim().is_empty() {
            return Err(CallError::invalid_request("model identifier is empty"));
        }
        if conversation.is_empty() {
            return Err(CallError::invalid_request("conversation is empty"));
        }
        if timeout.is_zero() {
            return Err(CallError::invalid_request("timeout must be greater than zero"));
        }

        let api_key = self.config.api_key().ok_or(CallError::MissingCredential)?;

        let payload = json!({
            "model": model,
            "messages": messages_to_openai_spec(conversation),
        });

        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            debug!(model, attempt = attempts + 1, "sending chat completion request");

            let (reason, detail) = match self.post(api_key, &payload, timeout).await {
                Ok(message) => return Ok(message),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retryable { reason, detail }) => (reason, detail),
            };

            attempts += 1;
            if attempts >= max_attempts {
                return Err(reason.exhausted(attempts, detail));
            }

            let wait = policy.backoff(reason, attempts - 1);
            warn!(
                model,
                ?reason,
                attempt = attempts,
                wait_secs = wait.as_secs_f64(),
                "transient failure, retrying: {}",
                detail
            );
            tokio::time::sleep(wait).await;
        }
    }
}

#[async_trait]
impl ModelCaller for OpenRouterProvider {
    async fn call(
        &self,
        model: &str,
        conversation: &[Message],
        timeout: Duration,
    ) -> CallOutcome {
        let result = self.complete(model, conversation, timeout).await;
        if let Err(err) = &result {
            warn!(model, kind = err.kind(), "model call failed: {}", err);
        }
        result.into()
    }
}
