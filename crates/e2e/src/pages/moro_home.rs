//! MoroSystems home page

use once_cell::sync::Lazy;
use regex::Regex;

use journeycheck_common::Viewport;

use crate::error::E2eResult;
use crate::locator::Locator;
use crate::page::Page;
use crate::pages::BasePage;

pub const MAIN_MENU_SELECTOR: &str = "[id=menu-main]";
pub const MAIN_LINK_SELECTOR: &str = "#menu-hlavni-menu a.m-main__link";
pub const CAREER_LINK_TEXT: &str = "Kariéra";

static HOME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"morosystems\.cz").expect("home URL pattern is valid"));

pub struct MoroHomePage {
    base: BasePage,
    url: String,
    main_menu: Locator,
    career_link: Locator,
}

impl MoroHomePage {
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            base: BasePage::new(page),
            url: url.into(),
            main_menu: Locator::new(MAIN_MENU_SELECTOR),
            career_link: Locator::new(MAIN_LINK_SELECTOR).with_text(CAREER_LINK_TEXT),
        }
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.navigate_to(&self.url).await
    }

    pub async fn verify_on_home_page(&self) -> E2eResult<()> {
        self.base.page().expect_url(&HOME_URL).await
    }

    /// Compact layouts hide the main menu behind a toggle
    pub async fn navigate_to_career_page(&self, viewport: &Viewport) -> E2eResult<()> {
        let page = self.base.page();
        if viewport.is_compact() {
            page.click(&self.main_menu).await?;
        }
        page.click(&self.career_link).await
    }
}
