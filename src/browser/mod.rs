//! WebDriver session management and page driving.
//!
//! [`PageDriver`] is a thin wrapper over a fantoccini [`Client`]: navigate,
//! wait for a ready selector, fill, click, read the rendered source.
//! [`with_page`] scopes a session around a body closure so the browser is
//! closed on every exit path.

mod paginate;
mod scroll;

pub use paginate::{drain_pages, PageCursor};
pub use scroll::{load_all, ScrollConfig, ScrollSurface};

use crate::config::BrowserConfig;
use crate::sources::SourceError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use futures_util::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// A live browser page backed by one WebDriver session.
#[derive(Debug)]
pub struct PageDriver {
    client: Client,
    wait_timeout: Duration,
}

impl PageDriver {
    /// Start a fresh session against the configured WebDriver endpoint.
    pub async fn connect(config: &BrowserConfig) -> Result<Self, SourceError> {
        let mut caps = Map::new();
        let mut chrome_args = vec![json!("--disable-gpu"), json!("--no-sandbox")];
        if config.headless {
            chrome_args.insert(0, json!("--headless=new"));
        }
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_args }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                SourceError::Browser(format!(
                    "failed to connect to WebDriver at {}: {}",
                    config.webdriver_url, e
                ))
            })?;

        Ok(Self {
            client,
            wait_timeout: Duration::from_millis(config.wait_timeout_ms),
        })
    }

    /// Navigate to a URL.
    pub async fn goto(&self, url: &str) -> Result<(), SourceError> {
        tracing::debug!(url, "navigating");
        self.client.goto(url).await?;
        Ok(())
    }

    /// Block until an element matching `selector` is present, up to the
    /// configured timeout. A timeout propagates as a browser error.
    pub async fn wait_for(&self, selector: &str) -> Result<(), SourceError> {
        self.client
            .wait()
            .at_most(self.wait_timeout)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|e| {
                SourceError::Browser(format!("waiting for '{}' failed: {}", selector, e))
            })?;
        Ok(())
    }

    /// Clear a form field and type into it.
    pub async fn fill(&self, selector: &str, text: &str) -> Result<(), SourceError> {
        let field = self.client.find(Locator::Css(selector)).await?;
        field.clear().await?;
        field.send_keys(text).await?;
        Ok(())
    }

    /// Click the first element matching `selector`.
    pub async fn click(&self, selector: &str) -> Result<(), SourceError> {
        self.client.find(Locator::Css(selector)).await?.click().await?;
        Ok(())
    }

    /// Read an attribute of the first element matching `selector`.
    ///
    /// Returns `None` when the element or the attribute is absent.
    pub async fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, SourceError> {
        let element = match absent_as_none(self.client.find(Locator::Css(selector)).await)? {
            Some(element) => element,
            None => return Ok(None),
        };
        Ok(element.attr(name).await?)
    }

    /// Run a script in the page, returning its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, SourceError> {
        Ok(self.client.execute(script, args).await?)
    }

    /// The rendered document source.
    pub async fn source(&self) -> Result<String, SourceError> {
        Ok(self.client.source().await?)
    }

    /// End the session, closing the browser window.
    pub async fn close(self) -> Result<(), SourceError> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl ScrollSurface for PageDriver {
    async fn scroll_to(&mut self, offset: u64) -> Result<(), SourceError> {
        self.execute("window.scrollTo(0, arguments[0]);", vec![json!(offset)])
            .await?;
        Ok(())
    }

    async fn content_height(&mut self) -> Result<u64, SourceError> {
        let value = self
            .execute("return document.body.scrollHeight;", vec![])
            .await?;
        value
            .as_u64()
            .ok_or_else(|| SourceError::Parse(format!("scrollHeight was not a number: {}", value)))
    }
}

/// Map a missing-element outcome to `None`; any other WebDriver failure
/// stays an error.
fn absent_as_none<T>(result: Result<T, CmdError>) -> Result<Option<T>, SourceError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Run `body` against a fresh WebDriver session, closing the session on every
/// exit path — success, scrape error, or early return.
///
/// When the body fails, its error wins over any close error; a close failure
/// after a successful scrape is still surfaced.
pub async fn with_page<T, F>(config: &BrowserConfig, body: F) -> Result<T, SourceError>
where
    F: for<'a> FnOnce(&'a mut PageDriver) -> BoxFuture<'a, Result<T, SourceError>>,
{
    let mut page = PageDriver::connect(config).await?;
    let outcome = body(&mut page).await;
    let closed = page.close().await;

    let value = outcome?;
    closed?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::{ErrorStatus, WebDriver};

    #[test]
    fn missing_element_maps_to_none() {
        let missing = CmdError::Standard(WebDriver::new(ErrorStatus::NoSuchElement, "no such element"));
        let mapped = absent_as_none::<()>(Err(missing)).unwrap();
        assert!(mapped.is_none());
    }

    #[test]
    fn other_webdriver_failures_stay_errors() {
        let timeout = CmdError::Standard(WebDriver::new(ErrorStatus::Timeout, "timed out"));
        let mapped = absent_as_none::<()>(Err(timeout));
        assert!(matches!(mapped, Err(SourceError::Browser(_))));
    }
}
