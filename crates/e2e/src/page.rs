//! Typed page handle shared by every page object of one test

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use serde_json::Value;
use tokio::time::sleep;

use journeycheck_common::{Error, Viewport};

use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;
use crate::playwright::{Command, Driver, PlaywrightConfig};

/// Script reporting whether the page is wider than the viewport
pub const HORIZONTAL_OVERFLOW_SCRIPT: &str = "document.body.scrollWidth > window.innerWidth";

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub action: Duration,
    pub navigation: Duration,
    pub expect: Duration,
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        PlaywrightConfig::default().timeouts()
    }
}

impl PlaywrightConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            action: self.action_timeout,
            navigation: self.navigation_timeout,
            expect: self.expect_timeout,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// One browser tab. Clones share the same tab.
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn Driver>,
    timeouts: Timeouts,
}

impl Page {
    pub fn new(driver: Arc<dyn Driver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        self.driver
            .send(Command::Goto {
                url: url.to_string(),
                timeout_ms: millis(self.timeouts.navigation),
            })
            .await?;
        Ok(())
    }

    pub async fn url(&self) -> E2eResult<String> {
        let value = self.driver.send(Command::Url).await?;
        opt_string(value, "url")?.ok_or_else(|| E2eError::Playwright("page has no URL".to_string()))
    }

    pub async fn set_viewport(&self, viewport: &Viewport) -> E2eResult<()> {
        self.driver
            .send(Command::SetViewport {
                width: viewport.width,
                height: viewport.height,
            })
            .await?;
        Ok(())
    }

    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.click_within(locator, self.timeouts.action).await
    }

    pub async fn click_within(&self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        self.driver
            .send(Command::Click {
                locator: locator.clone(),
                timeout_ms: millis(timeout),
            })
            .await?;
        Ok(())
    }

    pub async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.driver
            .send(Command::Fill {
                locator: locator.clone(),
                value: value.to_string(),
                timeout_ms: millis(self.timeouts.action),
            })
            .await?;
        Ok(())
    }

    pub async fn press(&self, locator: &Locator, key: &str) -> E2eResult<()> {
        self.driver
            .send(Command::Press {
                locator: locator.clone(),
                key: key.to_string(),
                timeout_ms: millis(self.timeouts.action),
            })
            .await?;
        Ok(())
    }

    /// Immediate visibility check, never waits
    pub async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        let value = self
            .driver
            .send(Command::IsVisible {
                locator: locator.clone(),
            })
            .await?;
        value
            .as_bool()
            .ok_or_else(|| unexpected("is_visible", &value))
    }

    pub async fn get_attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        let value = self
            .driver
            .send(Command::GetAttribute {
                locator: locator.clone(),
                name: name.to_string(),
                timeout_ms: millis(self.timeouts.action),
            })
            .await?;
        opt_string(value, "get_attribute")
    }

    pub async fn text_content(&self, locator: &Locator) -> E2eResult<Option<String>> {
        let value = self
            .driver
            .send(Command::TextContent {
                locator: locator.clone(),
                timeout_ms: millis(self.timeouts.action),
            })
            .await?;
        opt_string(value, "text_content")
    }

    pub async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let value = self
            .driver
            .send(Command::Count {
                locator: locator.clone(),
            })
            .await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| unexpected("count", &value))
    }

    pub async fn evaluate(&self, expression: &str) -> E2eResult<Value> {
        self.driver
            .send(Command::Evaluate {
                expression: expression.to_string(),
            })
            .await
    }

    pub async fn has_horizontal_overflow(&self) -> E2eResult<bool> {
        let value = self.evaluate(HORIZONTAL_OVERFLOW_SCRIPT).await?;
        value
            .as_bool()
            .ok_or_else(|| unexpected("horizontal overflow check", &value))
    }

    pub async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<()> {
        self.driver
            .send(Command::Screenshot {
                path: path.to_path_buf(),
                full_page,
            })
            .await?;
        Ok(())
    }

    /// Poll the page URL until it matches `pattern` or the expect timeout runs out
    pub async fn expect_url(&self, pattern: &Regex) -> E2eResult<()> {
        let limit = self.timeouts.expect;
        let start = Instant::now();

        loop {
            let url = self.url().await?;
            if pattern.is_match(&url) {
                return Ok(());
            }
            if start.elapsed() >= limit {
                return Err(Error::assertion(
                    "page URL",
                    format!("to match /{}/ within {} ms", pattern.as_str(), millis(limit)),
                    url,
                )
                .into());
            }
            sleep(self.timeouts.poll_interval).await;
        }
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn opt_string(value: Value, op: &str) -> E2eResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(unexpected(op, &other)),
    }
}

fn unexpected(op: &str, value: &Value) -> E2eError {
    E2eError::Playwright(format!("unexpected {} result from bridge: {}", op, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of URLs
    struct UrlSequence {
        urls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl Driver for UrlSequence {
        async fn send(&self, command: Command) -> E2eResult<Value> {
            assert_eq!(command, Command::Url);
            let mut urls = self.urls.lock().unwrap();
            let next = if urls.len() > 1 { urls.remove(0) } else { urls[0] };
            Ok(Value::String(next.to_string()))
        }
    }

    fn page(urls: Vec<&'static str>, expect: Duration) -> Page {
        let timeouts = Timeouts {
            expect,
            poll_interval: Duration::from_millis(5),
            ..Timeouts::default()
        };
        Page::new(Arc::new(UrlSequence { urls: Mutex::new(urls) }), timeouts)
    }

    #[tokio::test]
    async fn expect_url_waits_for_navigation() {
        let page = page(
            vec!["https://google.com", "https://google.com", "https://www.morosystems.cz/"],
            Duration::from_secs(2),
        );
        let pattern = Regex::new(r"morosystems\.cz").unwrap();
        page.expect_url(&pattern).await.unwrap();
    }

    #[tokio::test]
    async fn expect_url_reports_actual_url_on_timeout() {
        let page = page(vec!["https://google.com"], Duration::from_millis(30));
        let pattern = Regex::new(r".*/kariera/?").unwrap();
        let err = page.expect_url(&pattern).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("https://google.com"), "{msg}");
        assert!(msg.contains("kariera"), "{msg}");
    }

    #[test]
    fn opt_string_rejects_non_strings() {
        assert_eq!(opt_string(Value::Null, "x").unwrap(), None);
        assert_eq!(
            opt_string(Value::String("a".into()), "x").unwrap().as_deref(),
            Some("a")
        );
        assert!(opt_string(Value::Bool(true), "x").is_err());
    }
}
