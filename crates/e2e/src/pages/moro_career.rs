//! MoroSystems career listing

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use journeycheck_common::expect::expect_contains_ignore_case;
use journeycheck_common::Error;

use crate::error::E2eResult;
use crate::locator::Locator;
use crate::page::Page;
use crate::pages::BasePage;

pub const CITY_SELECT_SELECTOR: &str = ".inp-custom-select__select";
pub const JOB_ITEMS_SELECTOR: &str = "li.c-positions__item";
pub const VISIBLE_JOB_ITEMS_SELECTOR: &str = "li.c-positions__item:visible";
pub const JOB_LOCATION_SELECTOR: &str = ".c-positions__info span";
const CITY_FILTER_SELECTOR: &str = r#"label[data-filter="{city}"]"#;

static CAREER_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*/kariera/?").expect("career URL pattern is valid"));

/// Selector of the filter option for `city`
pub fn city_filter_selector(city: &str) -> String {
    CITY_FILTER_SELECTOR.replace("{city}", city)
}

pub struct MoroCareerPage {
    base: BasePage,
    url: String,
    city_select: Locator,
    job_items: Locator,
    visible_job_items: Locator,
}

impl MoroCareerPage {
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            base: BasePage::new(page),
            url: url.into(),
            city_select: Locator::new(CITY_SELECT_SELECTOR),
            job_items: Locator::new(JOB_ITEMS_SELECTOR),
            visible_job_items: Locator::new(VISIBLE_JOB_ITEMS_SELECTOR),
        }
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.base.navigate_to(&self.url).await
    }

    pub async fn verify_on_career_page(&self) -> E2eResult<()> {
        self.base.page().expect_url(&CAREER_URL).await
    }

    pub async fn filter_by_city(&self, city: &str) -> E2eResult<()> {
        let page = self.base.page();
        page.click(&self.city_select).await?;
        page.click(&Locator::new(city_filter_selector(city))).await
    }

    /// Every visible position must be located in `city`.
    ///
    /// No visible positions passes with a warning, unless the listing
    /// selector matches nothing at all, which means the page changed.
    pub async fn assert_job_locations(&self, city: &str) -> E2eResult<()> {
        let page = self.base.page();
        let visible = page.count(&self.visible_job_items).await?;

        if visible == 0 {
            let listed = page.count(&self.job_items).await?;
            if listed == 0 {
                return Err(Error::assertion(
                    "job listing",
                    format!("at least one element matching {:?}", JOB_ITEMS_SELECTOR),
                    "no elements",
                )
                .into());
            }
            warn!(
                "No visible positions for {} ({} listed in total), skipping location checks",
                city, listed
            );
            return Ok(());
        }

        for i in 0..visible {
            let location = self
                .visible_job_items
                .clone()
                .nth(i)
                .locator(JOB_LOCATION_SELECTOR)
                .first();
            let text = page.text_content(&location).await?.unwrap_or_default();
            expect_contains_ignore_case(
                &format!("location of position #{}", i + 1),
                &text,
                city,
            )?;
        }

        info!("{} visible position(s) located in {}", visible, city);
        Ok(())
    }
}
