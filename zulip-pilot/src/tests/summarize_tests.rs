use crate::extract::Message;
use crate::summarize::{
    estimate_cost, OpenAiSummarizer, SummaryResult, Summarizer, SENTINEL_SUMMARY,
};

fn sample_messages() -> Vec<Message> {
    vec![
        Message {
            content: "hi".to_string(),
            timestamp: "10:00".to_string(),
        },
        Message {
            content: "bye".to_string(),
            timestamp: "10:01".to_string(),
        },
    ]
}

#[test]
fn cost_estimate_matches_published_pricing() {
    // (20/1000)*0.0005 + (10/1000)*0.0015 = 0.000025
    assert_eq!(estimate_cost(20, 10), 0.000025);
    assert_eq!(estimate_cost(0, 0), 0.0);
    // 6-decimal rounding
    assert_eq!(estimate_cost(1, 0), 0.000001);
}

#[test]
fn failure_result_carries_sentinel_and_error() {
    let result = SummaryResult::failure("connection reset");
    assert_eq!(result.summary, SENTINEL_SUMMARY);
    assert_eq!(result.usage.prompt_tokens, None);
    assert_eq!(result.usage.completion_tokens, None);
    assert_eq!(result.usage.total_tokens, None);
    assert_eq!(result.usage.cost_usd, None);
    assert_eq!(result.usage.error.as_deref(), Some("connection reset"));
}

#[test]
fn usage_error_key_is_omitted_when_absent() {
    let result = SummaryResult::failure("boom");
    let failed = serde_json::to_value(&result.usage).unwrap();
    assert_eq!(failed["error"], "boom");

    let clean = serde_json::to_value(crate::summarize::UsageStats::default()).unwrap();
    assert!(!clean.as_object().unwrap().contains_key("error"));
    assert!(clean["cost_usd"].is_null());
}

#[tokio::test]
async fn unreachable_service_is_value_encoded_not_raised() {
    crate::tests::init_tracing();
    // Nothing listens on the discard port; the request fails fast.
    let summarizer = OpenAiSummarizer::with_endpoint("sk-test", "http://127.0.0.1:9/v1/chat/completions");

    let result = summarizer.summarize(&sample_messages()).await;

    assert_eq!(result.summary, SENTINEL_SUMMARY);
    assert!(result.usage.cost_usd.is_none());
    assert!(!result.usage.error.as_deref().unwrap_or_default().is_empty());
}
