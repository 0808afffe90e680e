use crate::errors::AutomationError;
use crate::extract::{extract_messages, Message};
use crate::locator::{poll_until, ElementState, DEFAULT_POLL_INTERVAL};
use crate::session::Session;
use std::time::Duration;
use tracing::{debug, info};

/// Named UI anchors of the Zulip web app. The workflow is coupled to this
/// page structure and breaks if Zulip changes it.
pub mod anchors {
    pub const USERNAME_FIELD: &str = "#id_username";
    pub const PASSWORD_FIELD: &str = "#id_password";
    pub const SUBMIT_BUTTON: &str = "css:button[type='submit']";
    /// The compose textarea doubles as the authenticated-UI marker: it only
    /// renders once login succeeded.
    pub const COMPOSE_TEXTAREA: &str = "#compose-textarea";
    pub const REPLY_BUTTON: &str = "#left_bar_compose_reply_button_big";
    pub const SEND_BUTTON: &str = "#compose-send-button";
    pub const MESSAGE_ROW: &str = "css:.message_row";
    pub const MESSAGE_CONTENT: &str = "css:.message_content";
    pub const MESSAGE_TIME: &str = "css:a.message-time";

    /// Left-sidebar stream link, matched by href fragment.
    pub fn stream_link(href_fragment: &str) -> String {
        format!("css:a[href*=\"{href_fragment}\"]")
    }

    /// Topic link inside the expanded stream's topic list.
    pub fn topic_link(topic_name: &str) -> String {
        format!("css:li.topic-list-item[data-topic-name=\"{topic_name}\"] > a.topic-box")
    }
}

// The topic list re-renders after the stream click; give it a moment before
// looking for the topic link.
const SIDEBAR_SETTLE: Duration = Duration::from_secs(1);

/// Account credentials for the target realm.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Where in the realm the workflow operates.
#[derive(Debug, Clone)]
pub struct ZulipTarget {
    /// Realm URL, also the login page.
    pub url: String,
    /// Href fragment identifying the stream link, e.g. `#narrow/channel/512718-general`.
    pub stream_href: String,
    /// Topic name within the stream.
    pub topic: String,
}

/// The scripted action steps against the Zulip UI: login, navigation,
/// message send and retrieval. Each step is a wait-then-act sequence; a wait
/// that outlives the session timeout fails the step.
pub struct ZulipBot<'a> {
    session: &'a Session,
    target: &'a ZulipTarget,
    credentials: &'a Credentials,
}

impl<'a> ZulipBot<'a> {
    pub fn new(session: &'a Session, target: &'a ZulipTarget, credentials: &'a Credentials) -> Self {
        Self {
            session,
            target,
            credentials,
        }
    }

    /// Log in with the configured credentials. The compose textarea appearing
    /// confirms success; its absence after the timeout is a login failure.
    pub async fn login(&self) -> Result<(), AutomationError> {
        info!(url = %self.target.url, "logging in");
        self.session.goto(&self.target.url).await?;

        let email_input = self
            .session
            .locator(anchors::USERNAME_FIELD)
            .wait(ElementState::Present, None)
            .await?;
        email_input.type_text(&self.credentials.email).await?;

        let password_input = self
            .session
            .locator(anchors::PASSWORD_FIELD)
            .wait(ElementState::Present, None)
            .await?;
        password_input.type_text(&self.credentials.password).await?;

        let login_button = self
            .session
            .locator(anchors::SUBMIT_BUTTON)
            .wait(ElementState::Clickable, None)
            .await?;
        login_button.click().await?;

        self.session
            .locator(anchors::COMPOSE_TEXTAREA)
            .wait(ElementState::Present, None)
            .await
            .map_err(|e| match e {
                AutomationError::Timeout(msg) => {
                    AutomationError::Timeout(format!("login was not confirmed: {msg}"))
                }
                other => other,
            })?;
        Ok(())
    }

    /// Open the configured stream and topic, then arm the compose area via
    /// the reply button.
    pub async fn navigate_to_topic(&self) -> Result<(), AutomationError> {
        info!(topic = %self.target.topic, "navigating to topic");

        let stream_link = self
            .session
            .locator(anchors::stream_link(&self.target.stream_href))
            .wait(ElementState::Clickable, None)
            .await?;
        stream_link.click().await?;
        tokio::time::sleep(SIDEBAR_SETTLE).await;

        let topic_link = self
            .session
            .locator(anchors::topic_link(&self.target.topic))
            .wait(ElementState::Clickable, None)
            .await?;
        topic_link.click().await?;
        debug!(topic = %self.target.topic, "topic opened");

        let reply_button = self
            .session
            .locator(anchors::REPLY_BUTTON)
            .wait(ElementState::Clickable, None)
            .await?;
        reply_button.click().await?;
        Ok(())
    }

    /// Post a message to the currently armed compose area, then wait until
    /// the last rendered message row carries a timestamp, which confirms the
    /// message round-tripped into the list.
    pub async fn send_message(&self, message: &str) -> Result<(), AutomationError> {
        info!(chars = message.len(), "sending message");

        let textarea = self
            .session
            .locator(anchors::COMPOSE_TEXTAREA)
            .wait(ElementState::Present, None)
            .await?;
        textarea.set_value(message).await?;

        let send_button = self
            .session
            .locator(anchors::SEND_BUTTON)
            .wait(ElementState::Clickable, None)
            .await?;
        send_button.click().await?;

        let session = self.session;
        poll_until(session.timeout(), DEFAULT_POLL_INTERVAL, move || async move {
            let rows = session.find_all(anchors::MESSAGE_ROW).await?;
            let last = rows.last().ok_or_else(|| {
                AutomationError::ElementNotFound("no message rows rendered".to_string())
            })?;
            let stamp = last.find(anchors::MESSAGE_TIME).await?.text().await?;
            if stamp.trim().is_empty() {
                Err(AutomationError::InvalidState(
                    "last message row has no timestamp yet".to_string(),
                ))
            } else {
                Ok(())
            }
        })
        .await
        .map_err(|e| match e {
            AutomationError::Timeout(msg) => {
                AutomationError::Timeout(format!("message send was not confirmed: {msg}"))
            }
            other => other,
        })
    }

    /// Retrieve the last `count` messages of the current topic in display
    /// order, most-recent-last. Rows that fail to extract are skipped.
    pub async fn last_messages(&self, count: usize) -> Result<Vec<Message>, AutomationError> {
        let rows = self.session.locator(anchors::MESSAGE_ROW).all().await?;
        Ok(extract_messages(&rows, count).await)
    }
}
