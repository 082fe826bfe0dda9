//! Search engine → MoroSystems → career page journey

use journeycheck_common::expect::expect_eq;
use journeycheck_common::{TestCase, Viewport};

use crate::context::GuiContext;
use crate::error::E2eResult;

pub const SEARCH_QUERY: &str = "MoroSystems";
pub const EXPECTED_URL: &str = "www.morosystems.cz";
pub const TARGET_CITY: &str = "Brno";

/// Run the journey at `viewport`, recording each step on `case`
pub async fn career_journey(gui: &GuiContext, viewport: &Viewport, case: &mut TestCase) -> E2eResult<()> {
    case.step("Google Search → MoroSystems", search_for_company(gui))
        .await?;
    case.step("Verify MoroSystems Home Page", gui.moro_home.verify_on_home_page())
        .await?;
    case.step("Navigate to 'Kariéra' Page", open_career_page(gui, viewport))
        .await?;
    case.step(&format!("Filter by city: {}", TARGET_CITY), filter_positions(gui, TARGET_CITY))
        .await?;
    case.step("Validate layout has no horizontal overflow", expect_no_overflow(gui))
        .await
}

async fn search_for_company(gui: &GuiContext) -> E2eResult<()> {
    gui.google.open().await?;
    gui.google.accept_cookies_if_visible().await?;
    gui.google.search(SEARCH_QUERY).await?;
    gui.google.assert_first_search_result(EXPECTED_URL).await?;
    gui.google.click_first_result().await
}

async fn open_career_page(gui: &GuiContext, viewport: &Viewport) -> E2eResult<()> {
    gui.moro_home.navigate_to_career_page(viewport).await?;
    gui.moro_career.verify_on_career_page().await
}

async fn filter_positions(gui: &GuiContext, city: &str) -> E2eResult<()> {
    gui.moro_career.filter_by_city(city).await?;
    gui.moro_career.assert_job_locations(city).await
}

async fn expect_no_overflow(gui: &GuiContext) -> E2eResult<()> {
    let overflow = gui.page().has_horizontal_overflow().await?;
    expect_eq("page has horizontal overflow", &false, &overflow)?;
    Ok(())
}
