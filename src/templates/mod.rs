//! Built-in home page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Tera's autoescaping is off; every
//! dynamic value goes through the `escape_html` filter, and the serialized
//! pagination state is escaped for a `<script>` block instead.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::helpers::{html_escape, post_url, url_for};
use crate::i18n::I18n;
use crate::pagination::PaginationController;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's escaper also rewrites `/`, which mangles URLs
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("partials/post.html", include_str!("theme/partials/post.html")),
        ])?;

        // Register custom filters
        tera.register_filter("escape_html", escape_html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the home page
    pub fn render_home(&self, page: &HomePage) -> Result<String> {
        let context = Context::from_serialize(page)?;
        self.render("index.html", &context)
            .context("failed to render index.html")
    }
}

/// Tera filter: escape HTML, `null` renders as nothing
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let escaped = match value {
        tera::Value::Null => String::new(),
        tera::Value::String(s) => html_escape(s),
        other => html_escape(&other.to_string()),
    };
    Ok(tera::Value::String(escaped))
}

/// Data structures for template context

/// Everything `index.html` needs
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub site_title: String,
    pub language: String,
    pub root: String,
    pub version: &'static str,
    pub posts: Vec<PostCard>,
    /// Whether the load-more control is shown
    pub load_more: bool,
    pub next_page: Option<String>,
    /// Form target of the load-more control
    ///
    /// Without one the control is left out and only the cursor is exposed,
    /// as `data-next-page` and in the embedded state.
    pub load_more_action: Option<String>,
    pub error: Option<String>,
    pub labels: HashMap<String, String>,
    pub state_json: String,
}

impl HomePage {
    /// Build the page for the current pagination state
    pub fn build(
        config: &SiteConfig,
        i18n: &I18n,
        controller: &PaginationController,
        load_more_action: Option<&str>,
    ) -> Result<Self> {
        let state = controller.state();
        let posts = state
            .posts
            .iter()
            .map(|post| PostCard::new(config, i18n, post))
            .collect();

        Ok(Self {
            site_title: config.title.clone(),
            language: i18n.language().to_string(),
            root: url_for(config, ""),
            version: env!("CARGO_PKG_VERSION"),
            posts,
            load_more: controller.can_load_more(),
            next_page: state.next_page.clone(),
            load_more_action: load_more_action.map(str::to_string),
            error: controller.failure().map(str::to_string),
            labels: i18n.get_all_translations(),
            state_json: script_json(state)?,
        })
    }
}

/// A post link on the home page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    /// Formatted date
    pub date: Option<String>,
    /// Raw date for the `datetime` attribute
    pub datetime: Option<String>,
    pub author: String,
    pub read_time: String,
}

impl PostCard {
    pub fn new(config: &SiteConfig, i18n: &I18n, post: &PostSummary) -> Self {
        Self {
            href: post_url(config, &post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            date: post.display_date.clone(),
            datetime: post.first_publication_date.clone(),
            author: post.author.clone(),
            read_time: i18n.get_count("read_time", post.read_time),
        }
    }
}

/// Serialize for embedding inside `<script type="application/json">`
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}
