use crate::extract::Message;
use crate::report::{save_report, Timings, WorkflowResult};
use crate::summarize::UsageStats;
use std::time::Duration;

#[test]
fn timings_round_to_two_decimals() {
    let mut timings = Timings::default();
    timings.record("login", Duration::from_millis(1234));
    assert_eq!(timings.get("login"), Some(1.23));
}

#[test]
fn timings_are_write_once_per_stage() {
    let mut timings = Timings::default();
    timings.record("login", Duration::from_secs(1));
    timings.record("login", Duration::from_secs(9));
    assert_eq!(timings.get("login"), Some(1.0));
    assert_eq!(timings.len(), 1);
}

#[test]
fn timings_serialize_as_a_flat_map() {
    let mut timings = Timings::default();
    timings.record("login", Duration::from_millis(500));
    timings.record("send_message", Duration::from_millis(250));
    let value = serde_json::to_value(&timings).unwrap();
    assert_eq!(value["login"], 0.5);
    assert_eq!(value["send_message"], 0.25);
}

#[test]
fn absent_summary_and_usage_are_omitted_from_json() {
    let result = WorkflowResult {
        messages: vec![],
        summary: None,
        usage: None,
        timings: Timings::default(),
    };
    let value = serde_json::to_value(&result).unwrap();
    let object = value.as_object().unwrap();
    assert!(object.contains_key("messages"));
    assert!(object.contains_key("timings"));
    assert!(!object.contains_key("summary"));
    assert!(!object.contains_key("usage"));
}

#[test]
fn save_report_writes_pretty_json_that_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("output.json");

    let mut timings = Timings::default();
    timings.record("login", Duration::from_millis(1500));
    let result = WorkflowResult {
        messages: vec![
            Message {
                content: "hi".to_string(),
                timestamp: "10:00".to_string(),
            },
            Message {
                content: "bye".to_string(),
                timestamp: "10:01".to_string(),
            },
        ],
        summary: Some("two greetings".to_string()),
        usage: Some(UsageStats {
            prompt_tokens: Some(20),
            completion_tokens: Some(10),
            total_tokens: Some(30),
            cost_usd: Some(0.000025),
            error: None,
        }),
        timings,
    };

    save_report(&path, &result).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'), "output should be pretty-printed");
    let restored: WorkflowResult = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored.messages, result.messages);
    assert_eq!(restored.summary, result.summary);
    assert_eq!(restored.usage, result.usage);
    assert_eq!(restored.timings, result.timings);
}

#[test]
fn save_report_overwrites_a_prior_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.json");
    std::fs::write(&path, "stale contents").unwrap();

    let result = WorkflowResult {
        messages: vec![],
        summary: None,
        usage: None,
        timings: Timings::default(),
    };
    save_report(&path, &result).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("stale contents"));
    serde_json::from_str::<WorkflowResult>(&raw).unwrap();
}
