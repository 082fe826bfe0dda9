//! Page objects
//!
//! One type per page. Each wraps the shared [`Page`] of the current test
//! together with the locators and actions for that page.

pub mod google;
pub mod moro_career;
pub mod moro_home;

pub use google::GooglePage;
pub use moro_career::MoroCareerPage;
pub use moro_home::MoroHomePage;

use tracing::info;

use crate::error::E2eResult;
use crate::page::Page;

/// Behaviour common to all page objects
#[derive(Clone)]
pub struct BasePage {
    page: Page,
}

impl BasePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn navigate_to(&self, url: &str) -> E2eResult<()> {
        info!("Navigating to {}", url);
        self.page.goto(url).await
    }
}
