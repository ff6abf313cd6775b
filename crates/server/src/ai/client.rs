//! Anthropic Messages API client.
//!
//! Non-streaming access only: the agenda summary is a single short
//! completion rendered into the day's first page load.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::AiConfig;

use super::error::{AiError, ApiErrorResponse};
use super::types::{Message, MessagesRequest, MessagesResponse};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are the assistant of a small cleaning-service business. \
     Given a list of upcoming customer visits, write a short, friendly daily \
     agenda summary for the operator: what is scheduled, anything overdue, \
     and anything that needs attention. Plain text, a few sentences.";

/// Client for generating agenda summaries.
#[derive(Clone)]
pub struct AgendaClient {
    inner: Arc<AgendaClientInner>,
}

struct AgendaClientInner {
    client: reqwest::Client,
    model: String,
}

impl AgendaClient {
    /// Create a new agenda client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(AgendaClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Summarize the given agenda listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, agenda), fields(model = %self.inner.model))]
    pub async fn summarize(&self, agenda: &str) -> Result<String, AiError> {
        let request = MessagesRequest {
            model: self.inner.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message::user(agenda)],
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: MessagesResponse = response
                .json()
                .await
                .map_err(|e| AiError::Parse(e.to_string()))?;
            return Ok(body.text());
        }

        if status.as_u16() == 401 {
            return Err(AiError::Unauthorized("invalid API key".to_string()));
        }
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(AiError::RateLimited(retry_after));
        }

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => Err(AiError::Api {
                error_type: body.error.error_type,
                message: body.error.message,
            }),
            Err(_) => Err(AiError::Parse(format!(
                "unexpected status {status} with unreadable body"
            ))),
        }
    }
}
