use crate::driver::DriverOptions;
use crate::element::{ElementImpl, WebElement};
use crate::errors::AutomationError;
use crate::selector::Selector;
use crate::session::BrowserEngine;
use async_trait::async_trait;
use std::sync::Arc;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::debug;

fn wd_err(e: WebDriverError) -> AutomationError {
    AutomationError::DriverError(e.to_string())
}

fn to_by(selector: &Selector) -> Result<By, AutomationError> {
    match selector {
        Selector::Id(id) => Ok(By::Id(id.as_str())),
        Selector::Css(css) => Ok(By::Css(css.as_str())),
        Selector::Invalid(reason) => Err(AutomationError::InvalidSelector(reason.clone())),
    }
}

/// `BrowserEngine` backed by a live WebDriver (chromedriver) session.
pub struct WebDriverEngine {
    driver: WebDriver,
}

impl WebDriverEngine {
    pub async fn connect(options: &DriverOptions) -> Result<Self, AutomationError> {
        let mut caps = DesiredCapabilities::chrome();
        if options.headless {
            caps.set_headless().map_err(wd_err)?;
            // Headless Chrome defaults to a tiny viewport; Zulip hides the
            // left sidebar below a minimum width.
            caps.add_arg("--window-size=1920,1080").map_err(wd_err)?;
        }
        caps.add_arg("--disable-gpu").map_err(wd_err)?;
        caps.add_arg("--no-sandbox").map_err(wd_err)?;

        debug!(url = %options.webdriver_url, headless = options.headless, "starting webdriver session");
        let driver = WebDriver::new(&options.webdriver_url, caps)
            .await
            .map_err(wd_err)?;
        Ok(Self { driver })
    }

    fn wrap(&self, element: thirtyfour::WebElement, hint: String) -> WebElement {
        WebElement::new(Arc::new(WdElement {
            driver: self.driver.clone(),
            element,
            hint,
        }))
    }
}

#[async_trait]
impl BrowserEngine for WebDriverEngine {
    async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        self.driver.goto(url).await.map_err(wd_err)
    }

    async fn find_element(&self, selector: &Selector) -> Result<WebElement, AutomationError> {
        let by = to_by(selector)?;
        let element = self
            .driver
            .find(by)
            .await
            .map_err(|e| AutomationError::ElementNotFound(format!("{selector}: {e}")))?;
        Ok(self.wrap(element, selector.to_string()))
    }

    async fn find_elements(
        &self,
        selector: &Selector,
    ) -> Result<Vec<WebElement>, AutomationError> {
        let by = to_by(selector)?;
        let elements = self.driver.find_all(by).await.map_err(wd_err)?;
        Ok(elements
            .into_iter()
            .map(|e| self.wrap(e, selector.to_string()))
            .collect())
    }

    async fn close(&self) -> Result<(), AutomationError> {
        // `quit` consumes the handle; WebDriver is internally refcounted so a
        // clone quits the shared session.
        self.driver.clone().quit().await.map_err(wd_err)
    }
}

struct WdElement {
    driver: WebDriver,
    element: thirtyfour::WebElement,
    hint: String,
}

#[async_trait]
impl ElementImpl for WdElement {
    async fn click(&self) -> Result<(), AutomationError> {
        self.element.click().await.map_err(wd_err)
    }

    async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.element.send_keys(text).await.map_err(wd_err)
    }

    async fn set_value(&self, value: &str) -> Result<(), AutomationError> {
        self.driver
            .execute(
                "arguments[0].value = arguments[1];",
                vec![
                    self.element.to_json().map_err(wd_err)?,
                    serde_json::Value::String(value.to_string()),
                ],
            )
            .await
            .map_err(wd_err)?;
        Ok(())
    }

    async fn text(&self) -> Result<String, AutomationError> {
        self.element.text().await.map_err(wd_err)
    }

    async fn is_clickable(&self) -> Result<bool, AutomationError> {
        self.element.is_clickable().await.map_err(wd_err)
    }

    async fn find(&self, selector: &Selector) -> Result<WebElement, AutomationError> {
        let by = to_by(selector)?;
        let element = self
            .element
            .find(by)
            .await
            .map_err(|e| AutomationError::ElementNotFound(format!("{selector}: {e}")))?;
        Ok(WebElement::new(Arc::new(WdElement {
            driver: self.driver.clone(),
            element,
            hint: format!("{} {selector}", self.hint),
        })))
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<WebElement>, AutomationError> {
        let by = to_by(selector)?;
        let elements = self.element.find_all(by).await.map_err(wd_err)?;
        Ok(elements
            .into_iter()
            .map(|element| {
                WebElement::new(Arc::new(WdElement {
                    driver: self.driver.clone(),
                    element,
                    hint: format!("{} {selector}", self.hint),
                }))
            })
            .collect())
    }

    fn selector_hint(&self) -> String {
        self.hint.clone()
    }
}
