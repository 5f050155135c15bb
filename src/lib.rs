//! spacetraveling: a blog home page backed by a headless CMS
//!
//! The first page of posts is fetched and rendered at build time; further
//! pages are appended on demand by the load-more controller.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod loader;
pub mod pagination;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the serialized pagination state inside the public directory
pub const STATE_FILE: &str = "pagination.json";

/// A site directory and its configuration
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Language overrides directory
    pub i18n_dir: PathBuf,
}

impl Site {
    /// Open a site directory
    ///
    /// `_config.yml` is optional; environment overrides apply either way.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let i18n_dir = base_dir.join(&config.i18n_dir);

        Self {
            config,
            base_dir,
            public_dir,
            i18n_dir,
        }
    }

    /// Labels for the configured language, with overrides from `i18n_dir`
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::new(&self.config.language);
        i18n.load_languages(&self.i18n_dir)?;
        Ok(i18n)
    }

    pub fn date_formatter(&self) -> helpers::DateFormatter {
        helpers::DateFormatter::from_config(&self.config)
    }

    /// Path of the generated home page
    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join("index.html")
    }

    /// Path of the serialized pagination state
    pub fn state_path(&self) -> PathBuf {
        self.public_dir.join(STATE_FILE)
    }
}
