use crate::element::WebElement;
use crate::errors::AutomationError;
use crate::zulip::anchors;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One chat message as captured from the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub timestamp: String,
}

/// Pull structured messages out of the rendered message rows.
///
/// Takes the last `count` rows in display order. A failure on an individual
/// row is logged and the row skipped; partial results beat aborting the whole
/// retrieval. An empty row set yields an empty list.
pub async fn extract_messages(rows: &[WebElement], count: usize) -> Vec<Message> {
    let mut messages = Vec::new();
    if rows.is_empty() {
        debug!("no message rows rendered");
        return messages;
    }

    let start = rows.len().saturating_sub(count);
    for (offset, row) in rows[start..].iter().enumerate() {
        match extract_row(row).await {
            Ok(message) => messages.push(message),
            Err(e) => warn!(row = start + offset, error = %e, "failed to extract message row"),
        }
    }
    messages
}

async fn extract_row(row: &WebElement) -> Result<Message, AutomationError> {
    let content = row.find(anchors::MESSAGE_CONTENT).await?.text().await?;
    let timestamp = row.find(anchors::MESSAGE_TIME).await?.text().await?;
    Ok(Message {
        content: content.trim().to_string(),
        timestamp: timestamp.trim().to_string(),
    })
}
