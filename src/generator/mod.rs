//! Generator module - writes the home page and its pagination state

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::helpers::DateFormatter;
use crate::i18n::I18n;
use crate::pagination::{PaginationController, PaginationState};
use crate::templates::{HomePage, TemplateRenderer};
use crate::Site;

/// Contents of `pagination.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(flatten)]
    pub state: PaginationState,
    /// Failure that halted pagination; a halted page stays halted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl SavedState {
    pub fn of(controller: &PaginationController) -> Self {
        Self {
            state: controller.state().clone(),
            failure: controller.failure().map(str::to_string),
        }
    }

    /// Resume pagination where the saved run left it
    pub fn into_controller(self, formatter: DateFormatter) -> PaginationController {
        PaginationController::from_state(self.state, formatter).with_failure(self.failure)
    }
}

/// Static home page generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let i18n = site.i18n()?;

        Ok(Self {
            site: site.clone(),
            renderer,
            i18n,
        })
    }

    /// Write `index.html` and the pagination state for `controller`
    pub fn generate(&self, controller: &PaginationController) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("failed to create {:?}", self.site.public_dir))?;

        let html = self.render(controller, None)?;
        let index_path = self.site.index_path();
        fs::write(&index_path, html)
            .with_context(|| format!("failed to write {:?}", index_path))?;
        tracing::debug!("Generated: {:?}", index_path);

        self.write_state(&SavedState::of(controller))?;

        tracing::info!(
            "Generated home page with {} posts (page {})",
            controller.posts().len(),
            controller.state().page
        );
        Ok(())
    }

    /// Render the home page without writing it
    pub fn render(
        &self,
        controller: &PaginationController,
        load_more_action: Option<&str>,
    ) -> Result<String> {
        let page = HomePage::build(&self.site.config, &self.i18n, controller, load_more_action)?;
        self.renderer.render_home(&page)
    }

    /// Read the state written by the last run
    pub fn load_state(&self) -> Result<SavedState> {
        let path = self.site.state_path();
        let content = fs::read_to_string(&path).with_context(|| {
            format!("failed to read {:?}, run `spacetraveling generate` first", path)
        })?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {:?}", path))
    }

    fn write_state(&self, saved: &SavedState) -> Result<()> {
        let path = self.site.state_path();
        let json = serde_json::to_string_pretty(saved)?;
        fs::write(&path, json).with_context(|| format!("failed to write {:?}", path))?;
        tracing::debug!("Generated: {:?}", path);
        Ok(())
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }
}
