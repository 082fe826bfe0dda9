//! Page object facade for one browser session

use journeycheck_common::config::GuiUrls;

use crate::page::Page;
use crate::pages::{GooglePage, MoroCareerPage, MoroHomePage};

/// Every page object of a test, all bound to the same tab
pub struct GuiContext {
    page: Page,
    pub google: GooglePage,
    pub moro_home: MoroHomePage,
    pub moro_career: MoroCareerPage,
}

impl GuiContext {
    pub fn new(page: Page, urls: &GuiUrls) -> Self {
        Self {
            google: GooglePage::new(page.clone(), &urls.google),
            moro_home: MoroHomePage::new(page.clone(), &urls.morosystems),
            moro_career: MoroCareerPage::new(page.clone(), &urls.moro_career),
            page,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}
