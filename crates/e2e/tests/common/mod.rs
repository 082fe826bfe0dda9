//! Scripted stand-in for a Playwright bridge
//!
//! `FakeSite` models just enough of the three pages for the page objects:
//! visibility, attributes, texts, match counts and the URL each click
//! navigates to. Locators are keyed by their display form.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use journeycheck_common::config::GuiUrls;
use journeycheck_common::Viewport;
use journeycheck_e2e::pages::{google, moro_career, moro_home};
use journeycheck_e2e::{Browser, Command, Driver, E2eError, E2eResult, Launcher, Locator, Page, Timeouts};

pub const GOOGLE: &str = "https://www.google.test/";
pub const MORO_HOME: &str = "https://www.morosystems.cz/";
pub const MORO_CAREER: &str = "https://www.morosystems.cz/kariera/";

pub fn urls() -> GuiUrls {
    GuiUrls {
        google: GOOGLE.to_string(),
        morosystems: MORO_HOME.to_string(),
        moro_career: MORO_CAREER.to_string(),
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeSite {
    pub url: String,
    pub visible: HashSet<String>,
    pub attributes: HashMap<(String, String), String>,
    pub texts: HashMap<String, String>,
    pub counts: HashMap<String, usize>,
    pub navigations: HashMap<String, String>,
    pub missing: HashSet<String>,
    /// Locators whose clicks never get a reply
    pub stalled: HashSet<String>,
    pub overflow: bool,
}

pub fn cookie_button() -> Locator {
    Locator::new(google::ACCEPT_COOKIES_BUTTON_SELECTOR)
}

pub fn search_box() -> Locator {
    Locator::new(google::SEARCH_BOX_SELECTOR)
}

pub fn first_result() -> Locator {
    Locator::new(google::FIRST_RESULT_SELECTOR).first()
}

pub fn main_menu() -> Locator {
    Locator::new(moro_home::MAIN_MENU_SELECTOR)
}

pub fn career_link() -> Locator {
    Locator::new(moro_home::MAIN_LINK_SELECTOR).with_text(moro_home::CAREER_LINK_TEXT)
}

pub fn job_items() -> Locator {
    Locator::new(moro_career::JOB_ITEMS_SELECTOR)
}

pub fn visible_job_items() -> Locator {
    Locator::new(moro_career::VISIBLE_JOB_ITEMS_SELECTOR)
}

pub fn job_location(index: usize) -> Locator {
    visible_job_items()
        .nth(index)
        .locator(moro_career::JOB_LOCATION_SELECTOR)
        .first()
}

pub fn city_option(city: &str) -> Locator {
    Locator::new(moro_career::city_filter_selector(city))
}

impl FakeSite {
    /// A site on which the whole journey succeeds
    pub fn happy() -> Self {
        let mut site = FakeSite::default();
        site.visible.insert(cookie_button().to_string());
        site.attributes.insert(
            (first_result().to_string(), "href".to_string()),
            MORO_HOME.to_string(),
        );
        site.navigations
            .insert(first_result().to_string(), MORO_HOME.to_string());
        site.navigations
            .insert(career_link().to_string(), MORO_CAREER.to_string());
        site.set_jobs(&["Brno", "Brno / Praha"], 5);
        site
    }

    /// Visible positions with the given locations, out of `listed` in total
    pub fn set_jobs(&mut self, locations: &[&str], listed: usize) {
        self.counts
            .insert(visible_job_items().to_string(), locations.len());
        self.counts.insert(job_items().to_string(), listed);
        for (i, location) in locations.iter().enumerate() {
            self.texts
                .insert(job_location(i).to_string(), location.to_string());
        }
    }
}

pub struct FakeDriver {
    site: Mutex<FakeSite>,
    log: Mutex<Vec<Command>>,
}

impl FakeDriver {
    pub fn new(site: FakeSite) -> Arc<Self> {
        Arc::new(Self {
            site: Mutex::new(site),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn commands(&self) -> Vec<Command> {
        self.log.lock().clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Click { locator, .. } => Some(locator.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn current_url(&self) -> String {
        self.site.lock().url.clone()
    }
}

pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        action: Duration::from_millis(50),
        navigation: Duration::from_millis(50),
        expect: Duration::from_millis(50),
        poll_interval: Duration::from_millis(5),
    }
}

pub fn page_for(driver: &Arc<FakeDriver>) -> Page {
    Page::new(driver.clone(), fast_timeouts())
}

fn check_present(site: &FakeSite, locator: &Locator, timeout_ms: u64) -> E2eResult<()> {
    if site.missing.contains(&locator.to_string()) {
        return Err(E2eError::Timeout {
            target: locator.to_string(),
            timeout_ms,
        });
    }
    Ok(())
}

#[async_trait]
impl Driver for FakeDriver {
    async fn send(&self, command: Command) -> E2eResult<Value> {
        self.log.lock().push(command.clone());
        let stalled = match &command {
            Command::Click { locator, .. } => self.site.lock().stalled.contains(&locator.to_string()),
            _ => false,
        };
        if stalled {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        let mut site = self.site.lock();

        match command {
            Command::Goto { url, .. } => {
                site.url = url;
                Ok(Value::Null)
            }
            Command::Url => Ok(Value::String(site.url.clone())),
            Command::SetViewport { .. } => Ok(Value::Null),
            Command::Click { locator, timeout_ms } => {
                check_present(&site, &locator, timeout_ms)?;
                if let Some(target) = site.navigations.get(&locator.to_string()).cloned() {
                    site.url = target;
                }
                Ok(Value::Null)
            }
            Command::Fill { locator, timeout_ms, .. } | Command::Press { locator, timeout_ms, .. } => {
                check_present(&site, &locator, timeout_ms)?;
                Ok(Value::Null)
            }
            Command::IsVisible { locator } => Ok(Value::Bool(site.visible.contains(&locator.to_string()))),
            Command::GetAttribute { locator, name, timeout_ms } => {
                check_present(&site, &locator, timeout_ms)?;
                Ok(site
                    .attributes
                    .get(&(locator.to_string(), name))
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null))
            }
            Command::TextContent { locator, timeout_ms } => {
                check_present(&site, &locator, timeout_ms)?;
                Ok(site
                    .texts
                    .get(&locator.to_string())
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null))
            }
            Command::Count { locator } => Ok(json!(site.counts.get(&locator.to_string()).copied().unwrap_or(0))),
            Command::Evaluate { .. } => Ok(Value::Bool(site.overflow)),
            Command::Screenshot { path, .. } => Ok(Value::String(path.display().to_string())),
            Command::Close { .. } => Ok(json!({ "video": null })),
        }
    }
}

/// Hands out a fresh `FakeDriver` on `site` for every launch
pub struct FakeLauncher {
    site: FakeSite,
    launched: Mutex<Vec<Arc<FakeDriver>>>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Arc<Self> {
        Arc::new(Self {
            site,
            launched: Mutex::new(Vec::new()),
        })
    }

    pub fn launched(&self) -> Vec<Arc<FakeDriver>> {
        self.launched.lock().clone()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, _browser: Browser, _viewport: Viewport, artifact_dir: &Path) -> E2eResult<Arc<dyn Driver>> {
        // the real bridge creates the video directory up front
        std::fs::create_dir_all(artifact_dir.join("video"))?;
        let driver = FakeDriver::new(self.site.clone());
        self.launched.lock().push(driver.clone());
        Ok(driver)
    }
}
