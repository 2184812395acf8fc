use crate::insight::{InsightData, InsightProvider, ProviderError, build_prompt};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 4,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}
#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}
#[derive(Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}
#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    api_key: Arc<String>,
    model: Arc<String>,
    endpoint: Arc<String>,
    max_retries: usize,
    timeout: Duration,
    http: Arc<Client>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential);
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            api_key: Arc::new(config.api_key),
            model: Arc::new(config.model),
            endpoint: Arc::new(endpoint),
            max_retries: config.max_retries.max(1),
            timeout: config.timeout,
            http: Arc::new(http),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// JSON body asking for a `{prediction, motivation}` object.
    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "prediction": {
                            "type": "STRING",
                            "description": "The prediction about the future year or history fact."
                        },
                        "motivation": {
                            "type": "STRING",
                            "description": "The motivational quote or congratulatory message."
                        }
                    },
                    "required": ["prediction", "motivation"]
                }
            }
        })
    }

    /// Low-level generateContent call with basic retry/backoff.
    async fn generate(&self, prompt: &str) -> Result<Value, ProviderError> {
        let body = Self::request_body(prompt);
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            let resp = self
                .http
                .post(self.endpoint.as_str())
                .header("x-goog-api-key", self.api_key.as_str())
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if status.is_success() {
                let text = resp.text().await?;
                return Ok(serde_json::from_str(&text)?);
            }

            let headers = resp.headers().clone();
            let text = resp.text().await.unwrap_or_default();

            // If rate limited, honor Retry-After header when present
            if status.as_u16() == 429 && attempt < self.max_retries {
                let wait_secs = headers
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(2);
                // Never wait longer than the whole call is allowed to take.
                let wait = Duration::from_secs(wait_secs).min(self.timeout);
                debug!(attempt, ?wait, "gemini rate-limited, retrying");
                sleep(wait).await;
                continue;
            }

            // Retry on 5xx server errors
            if status.is_server_error() && attempt < self.max_retries {
                let backoff = Duration::from_millis(250u64.saturating_mul(1 << (attempt - 1)));
                debug!(attempt, status = status.as_u16(), ?backoff, "gemini server error, retrying");
                sleep(backoff).await;
                continue;
            }

            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
    }
}

/// Extracts the first candidate's text and parses it as an insight.
fn parse_insight(json: Value) -> Result<InsightData, ProviderError> {
    let parsed: GenerateContentResponse = serde_json::from_value(json)?;

    let text = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().find_map(|part| part.text))
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)?;

    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn fetch_insight(
        &self,
        retirement_year: i32,
        is_retired: bool,
    ) -> Result<InsightData, ProviderError> {
        let prompt = build_prompt(retirement_year, is_retired);
        let json = timeout(self.timeout, self.generate(&prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;
        parse_insight(json)
    }
}
