use crate::element::WebElement;
use crate::errors::AutomationError;
use crate::selector::Selector;
use crate::session::BrowserEngine;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// Default timeout if none is specified on the locator itself
const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(15);

/// How often waits re-check the page.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The page condition a wait resolves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// The element is attached to the page.
    Present,
    /// The element is attached, displayed and enabled.
    Clickable,
}

/// A high-level API for finding and waiting on page elements.
#[derive(Clone)]
pub struct Locator {
    engine: Arc<dyn BrowserEngine>,
    selector: Selector,
    timeout: Duration, // Default timeout for this locator instance
}

impl Locator {
    pub(crate) fn new(engine: Arc<dyn BrowserEngine>, selector: Selector) -> Self {
        Self {
            engine,
            selector,
            timeout: DEFAULT_LOCATOR_TIMEOUT,
        }
    }

    /// Set a default timeout for waiting operations on this locator instance.
    /// This timeout is used if no specific timeout is passed to `wait`.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Wait for an element matching the locator to reach the required state,
    /// up to the specified timeout. If no timeout is provided, uses the
    /// locator's default timeout. Timeout expiry is a hard failure.
    pub async fn wait(
        &self,
        state: ElementState,
        timeout: Option<Duration>,
    ) -> Result<WebElement, AutomationError> {
        debug!(selector = %self.selector, ?state, "waiting for element");
        let effective_timeout = timeout.unwrap_or(self.timeout);
        let engine = &self.engine;
        let selector = &self.selector;

        poll_until(effective_timeout, DEFAULT_POLL_INTERVAL, move || async move {
            let element = engine.find_element(selector).await?;
            match state {
                ElementState::Present => Ok(element),
                ElementState::Clickable => {
                    if element.is_clickable().await? {
                        Ok(element)
                    } else {
                        Err(AutomationError::InvalidState(format!(
                            "{selector} is not clickable"
                        )))
                    }
                }
            }
        })
        .await
        .map_err(|e| match e {
            AutomationError::Timeout(msg) => AutomationError::Timeout(format!(
                "waiting for element {} to be {:?}: {msg}",
                self.selector, state
            )),
            other => other,
        })
    }

    /// Get all elements matching this locator right now, without waiting.
    pub async fn all(&self) -> Result<Vec<WebElement>, AutomationError> {
        self.engine.find_elements(&self.selector).await
    }
}

/// Poll a fallible async operation until it succeeds or the timeout expires.
///
/// This is the single wait primitive every step goes through: an operation
/// plus a bound, rechecked at `interval`. An `InvalidSelector` error aborts
/// immediately since no amount of polling will fix it. On expiry the last
/// observed error is folded into the returned `Timeout`.
pub async fn poll_until<T, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut op: F,
) -> Result<T, AutomationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AutomationError>>,
{
    let deadline = Instant::now() + timeout;
    let mut last_error;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e @ AutomationError::InvalidSelector(_)) => return Err(e),
            Err(e) => last_error = e,
        }
        if Instant::now() >= deadline {
            return Err(AutomationError::Timeout(format!(
                "gave up after {:.1}s ({last_error})",
                timeout.as_secs_f64()
            )));
        }
        tokio::time::sleep(interval).await;
    }
}
