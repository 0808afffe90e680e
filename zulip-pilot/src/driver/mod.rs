use crate::errors::AutomationError;
use crate::session::BrowserEngine;
use std::sync::Arc;

pub mod webdriver;

/// Options for launching the browser side of a run.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// WebDriver endpoint (chromedriver).
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
        }
    }
}

/// Connect to the WebDriver endpoint and hand back an engine handle.
///
/// This is the only place production code touches a concrete driver type;
/// everything downstream works against `Arc<dyn BrowserEngine>`.
pub async fn connect(options: &DriverOptions) -> Result<Arc<dyn BrowserEngine>, AutomationError> {
    let engine = webdriver::WebDriverEngine::connect(options).await?;
    Ok(Arc::new(engine))
}
