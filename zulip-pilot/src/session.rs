use crate::element::WebElement;
use crate::errors::AutomationError;
use crate::locator::Locator;
use crate::selector::Selector;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The common trait every browser backend must implement.
///
/// Lookups are immediate: they report what the page shows right now. All
/// waiting happens one layer up, in [`Locator`], so backends stay trivial to
/// fake in tests.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Load the given URL in the current window.
    async fn goto(&self, url: &str) -> Result<(), AutomationError>;

    /// Find the first element matching the selector, or fail immediately.
    async fn find_element(&self, selector: &Selector) -> Result<WebElement, AutomationError>;

    /// Find all elements matching the selector (empty vec when none match).
    async fn find_elements(&self, selector: &Selector)
        -> Result<Vec<WebElement>, AutomationError>;

    /// Tear down the browser session.
    async fn close(&self) -> Result<(), AutomationError>;
}

/// A scoped browser session: the main entry point for page interaction.
///
/// Owns the engine handle plus the shared wait timeout used by every locator
/// created from it. The session must be closed exactly once per run; the
/// workflow orchestrator takes care of that on every exit path.
#[derive(Clone)]
pub struct Session {
    engine: Arc<dyn BrowserEngine>,
    timeout: Duration,
}

impl Session {
    pub fn new(engine: Arc<dyn BrowserEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// The shared upper bound applied to every wait in this session.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn locator(&self, selector: impl Into<Selector>) -> Locator {
        Locator::new(self.engine.clone(), selector.into()).set_default_timeout(self.timeout)
    }

    pub async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        debug!(url, "loading page");
        self.engine.goto(url).await
    }

    /// Immediate multi-element lookup, without waiting.
    pub async fn find_all(
        &self,
        selector: impl Into<Selector>,
    ) -> Result<Vec<WebElement>, AutomationError> {
        self.engine.find_elements(&selector.into()).await
    }

    pub async fn close(&self) -> Result<(), AutomationError> {
        debug!("closing browser session");
        self.engine.close().await
    }
}
