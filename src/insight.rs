//! Retirement insight: the provider capability and its fallback.
//!
//! An insight is decorative. Nothing here can fail from the caller's point of
//! view: [`insight_or_fallback`] swallows provider errors after logging them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const FALLBACK_PREDICTION: &str = "The future is unwritten, but it looks bright!";
pub const FALLBACK_MOTIVATION: &str = "Keep moving forward.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightData {
    pub prediction: String,
    pub motivation: String,
}

impl InsightData {
    pub fn fallback() -> Self {
        Self {
            prediction: FALLBACK_PREDICTION.to_string(),
            motivation: FALLBACK_MOTIVATION.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured (set API_KEY or GEMINI_API_KEY)")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("no insight within {0:?}")]
    Timeout(std::time::Duration),
    #[error("malformed insight payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Something that can produce a short narrative for a retirement year.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn fetch_insight(
        &self,
        retirement_year: i32,
        is_retired: bool,
    ) -> Result<InsightData, ProviderError>;
}

/// Provider used when no credential is available; every fetch fails.
pub struct UnconfiguredProvider;

#[async_trait]
impl InsightProvider for UnconfiguredProvider {
    async fn fetch_insight(&self, _: i32, _: bool) -> Result<InsightData, ProviderError> {
        Err(ProviderError::MissingCredential)
    }
}

/// Asks `provider` for an insight, substituting the fallback on any error.
pub async fn insight_or_fallback(
    provider: &dyn InsightProvider,
    retirement_year: i32,
    is_retired: bool,
) -> InsightData {
    match provider.fetch_insight(retirement_year, is_retired).await {
        Ok(insight) => insight,
        Err(e) => {
            warn!(retirement_year, is_retired, error = %e, "insight unavailable, using fallback");
            InsightData::fallback()
        }
    }
}

/// Prompt sent to the generative model.
pub fn build_prompt(retirement_year: i32, is_retired: bool) -> String {
    if is_retired {
        format!(
            "I retired in or before {retirement_year}. Generate a short, congratulatory \
             message about enjoying retirement and a fun fact about history from around \
             that year."
        )
    } else {
        format!(
            "I will retire in the year {retirement_year}.\n\
             1. Provide a short, optimistic, sci-fi style prediction about what technology \
             or daily life might be like in {retirement_year}.\n\
             2. Provide a short motivational quote about career endurance and looking \
             forward to the future."
        )
    }
}
