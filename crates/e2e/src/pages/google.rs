//! Search engine page

use tracing::{debug, info};

use journeycheck_common::expect::expect_contains;

use crate::error::E2eResult;
use crate::locator::Locator;
use crate::page::Page;
use crate::pages::BasePage;

pub const ACCEPT_COOKIES_BUTTON_SELECTOR: &str = r#"button:has-text("Přijmout vše")"#;
pub const SEARCH_BOX_SELECTOR: &str = r#"textarea[name="q"]"#;
pub const FIRST_RESULT_SELECTOR: &str = "div#search a";

pub struct GooglePage {
    base: BasePage,
    url: String,
    accept_cookies_button: Locator,
    search_box: Locator,
    first_result: Locator,
}

impl GooglePage {
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            base: BasePage::new(page),
            url: url.into(),
            accept_cookies_button: Locator::new(ACCEPT_COOKIES_BUTTON_SELECTOR),
            search_box: Locator::new(SEARCH_BOX_SELECTOR),
            first_result: Locator::new(FIRST_RESULT_SELECTOR).first(),
        }
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.navigate_to(&self.url).await
    }

    /// Dismiss the consent dialog when it is shown; absent dialog is fine
    pub async fn accept_cookies_if_visible(&self) -> E2eResult<()> {
        let page = self.base.page();
        if page.is_visible(&self.accept_cookies_button).await? {
            info!("Accepting cookie consent");
            page.click(&self.accept_cookies_button).await?;
        } else {
            debug!("No cookie consent dialog");
        }
        Ok(())
    }

    pub async fn search(&self, query: &str) -> E2eResult<()> {
        let page = self.base.page();
        page.fill(&self.search_box, query).await?;
        page.press(&self.search_box, "Enter").await
    }

    pub async fn assert_first_search_result(&self, expected_url_part: &str) -> E2eResult<()> {
        let href = self
            .base
            .page()
            .get_attribute(&self.first_result, "href")
            .await?
            .unwrap_or_default();
        expect_contains("first search result href", &href, expected_url_part)?;
        Ok(())
    }

    pub async fn click_first_result(&self) -> E2eResult<()> {
        self.base.page().click(&self.first_result).await
    }
}
