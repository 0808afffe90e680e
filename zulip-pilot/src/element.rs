use crate::errors::AutomationError;
use crate::selector::Selector;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The operations every element handle must support, regardless of the
/// underlying driver. Production code only ever sees `WebElement`; the
/// concrete driver (or a test double) lives behind this trait.
#[async_trait]
pub trait ElementImpl: Send + Sync {
    async fn click(&self) -> Result<(), AutomationError>;

    /// Type text into the element as keystrokes.
    async fn type_text(&self, text: &str) -> Result<(), AutomationError>;

    /// Assign the element's value directly (script-style), bypassing keystrokes.
    async fn set_value(&self, value: &str) -> Result<(), AutomationError>;

    async fn text(&self) -> Result<String, AutomationError>;

    /// Whether the element is displayed and enabled.
    async fn is_clickable(&self) -> Result<bool, AutomationError>;

    /// Find the first descendant matching the selector.
    async fn find(&self, selector: &Selector) -> Result<WebElement, AutomationError>;

    /// Find all descendants matching the selector.
    async fn find_all(&self, selector: &Selector) -> Result<Vec<WebElement>, AutomationError>;

    /// A short human-readable label for logs and errors.
    fn selector_hint(&self) -> String;
}

/// A handle to a rendered element on the page.
#[derive(Clone)]
pub struct WebElement {
    inner: Arc<dyn ElementImpl>,
}

impl WebElement {
    pub fn new(inner: Arc<dyn ElementImpl>) -> Self {
        Self { inner }
    }

    pub async fn click(&self) -> Result<(), AutomationError> {
        self.inner.click().await
    }

    pub async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.inner.type_text(text).await
    }

    pub async fn set_value(&self, value: &str) -> Result<(), AutomationError> {
        self.inner.set_value(value).await
    }

    pub async fn text(&self) -> Result<String, AutomationError> {
        self.inner.text().await
    }

    pub async fn is_clickable(&self) -> Result<bool, AutomationError> {
        self.inner.is_clickable().await
    }

    pub async fn find(&self, selector: impl Into<Selector>) -> Result<WebElement, AutomationError> {
        self.inner.find(&selector.into()).await
    }

    pub async fn find_all(
        &self,
        selector: impl Into<Selector>,
    ) -> Result<Vec<WebElement>, AutomationError> {
        self.inner.find_all(&selector.into()).await
    }

    pub fn selector_hint(&self) -> String {
        self.inner.selector_hint()
    }
}

impl fmt::Debug for WebElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebElement")
            .field("selector", &self.inner.selector_hint())
            .finish()
    }
}
