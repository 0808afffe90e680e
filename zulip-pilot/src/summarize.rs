use crate::extract::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Placeholder summary returned whenever the service call fails.
pub const SENTINEL_SUMMARY: &str = "Summary unavailable due to error.";

// Pricing for gpt-3.5-turbo, USD per 1K tokens.
const PRICE_PER_1K_PROMPT: f64 = 0.0005;
const PRICE_PER_1K_COMPLETION: f64 = 0.0015;

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SUMMARY_MODEL: &str = "gpt-3.5-turbo";
const SUMMARY_MAX_TOKENS: u32 = 100;

/// Token counts and estimated cost reported by the summarization service.
/// All numeric fields are null when the call failed; `error` carries the
/// reason in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub cost_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a summarization attempt produced. Errors are value-encoded: a failed
/// call yields the sentinel summary plus a usage object carrying the error.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
    pub usage: UsageStats,
}

impl SummaryResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            summary: SENTINEL_SUMMARY.to_string(),
            usage: UsageStats {
                error: Some(error.into()),
                ..UsageStats::default()
            },
        }
    }
}

/// Capability interface for the external summarization service.
///
/// `summarize` never fails past its own boundary; callers always get a
/// `SummaryResult` and decide nothing based on transport-level errors.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, messages: &[Message]) -> SummaryResult;
}

/// Estimated cost in USD for a gpt-3.5-turbo call, rounded to 6 decimals.
pub fn estimate_cost(prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let cost = (prompt_tokens as f64 / 1000.0) * PRICE_PER_1K_PROMPT
        + (completion_tokens as f64 / 1000.0) * PRICE_PER_1K_COMPLETION;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

#[derive(Debug, thiserror::Error)]
enum SummarizeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api returned status {0}: {1}")]
    Status(u16, String),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Summarizer over the OpenAI chat-completions API.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, OPENAI_CHAT_COMPLETIONS_URL)
    }

    /// Point the summarizer at an alternate chat-completions endpoint
    /// (gateway or test server).
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn request_summary(&self, messages: &[Message]) -> Result<SummaryResult, SummarizeError> {
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        let prompt = format!(
            "Summarize the following Zulip chat messages:\n{}",
            contents.join("\n")
        );
        let request = ChatRequest {
            model: SUMMARY_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: SUMMARY_MAX_TOKENS,
        };

        debug!(message_count = messages.len(), model = SUMMARY_MODEL, "requesting summary");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status(status.as_u16(), body));
        }

        let body: ChatResponse = response.json().await?;
        let choice = body
            .choices
            .first()
            .ok_or_else(|| SummarizeError::Malformed("response has no choices".to_string()))?;
        let summary = choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| SummarizeError::Malformed("choice has no message content".to_string()))?
            .trim()
            .to_string();

        let usage = match body.usage {
            Some(u) => UsageStats {
                prompt_tokens: Some(u.prompt_tokens),
                completion_tokens: Some(u.completion_tokens),
                total_tokens: Some(u.total_tokens),
                cost_usd: Some(estimate_cost(u.prompt_tokens, u.completion_tokens)),
                error: None,
            },
            None => UsageStats::default(),
        };

        Ok(SummaryResult { summary, usage })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, messages: &[Message]) -> SummaryResult {
        match self.request_summary(messages).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "summarization failed");
                SummaryResult::failure(e.to_string())
            }
        }
    }
}
