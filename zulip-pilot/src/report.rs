use crate::errors::AutomationError;
use crate::extract::Message;
use crate::summarize::UsageStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Per-stage elapsed seconds for one run, rounded to 2 decimals.
/// Write-once per stage: the first recording for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timings(BTreeMap<String, f64>);

impl Timings {
    pub fn record(&mut self, stage: &str, elapsed: Duration) {
        let secs = (elapsed.as_secs_f64() * 100.0).round() / 100.0;
        self.0.entry(stage.to_string()).or_insert(secs);
    }

    pub fn get(&self, stage: &str) -> Option<f64> {
        self.0.get(stage).copied()
    }

    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The self-contained result of one workflow run, serialized verbatim to the
/// output file. `summary`/`usage` are absent entirely when summarization was
/// not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageStats>,
    pub timings: Timings,
}

/// Write the result as pretty-printed UTF-8 JSON, overwriting any prior file
/// at that path. Callers treat failures as non-fatal.
pub fn save_report(path: &Path, result: &WorkflowResult) -> Result<(), AutomationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "report written");
    Ok(())
}
