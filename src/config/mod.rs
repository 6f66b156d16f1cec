//! Site configuration management for `daybook.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[site]`    | Page titles, favicon, status link, app scheme  |
//! | `[build]`   | Output and static asset paths, minification    |
//! | `[notion]`  | Search API endpoint, limits, token variable    |
//!
//! The file is optional: without it every field takes its default.
//!
//! # Example
//!
//! ```toml
//! [site]
//! status_url = "https://app.netlify.com/sites/daybook-redirects/deploys"
//!
//! [build]
//! output = "build"
//!
//! [notion]
//! timeout_secs = 10
//! ```

mod build;
pub mod defaults;
mod error;
mod notion;
mod site;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use notion::NotionConfig;
pub use site::SiteConfig;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing daybook.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DaybookConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Log every written file
    #[serde(skip)]
    pub verbose: bool,

    /// Fixture directory answering searches instead of Notion (`--fixtures`)
    #[serde(skip)]
    pub fixtures: Option<PathBuf>,

    /// Directory recording search responses as fixtures (`--capture`)
    #[serde(skip)]
    pub capture: Option<PathBuf>,

    /// Page text and links
    #[serde(default)]
    pub site: SiteConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Search API settings
    #[serde(default)]
    pub notion: NotionConfig,
}

impl DaybookConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: DaybookConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `daybook.toml` from the CLI root if present, apply CLI overrides
    /// and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = config_path;
        config.update_with_cli(cli, root);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        self.verbose = cli.verbose;

        if let Some(args) = cli.build_args() {
            Self::update_option(&mut self.build.output, args.output.as_ref());
            Self::update_option(&mut self.build.static_dir, args.static_dir.as_ref());
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            self.fixtures = args.fixtures.clone();
            self.capture = args.capture.clone();
        }

        let root = Self::normalize_path(root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.static_dir = Self::normalize_path(&root.join(&self.build.static_dir));
        self.fixtures = self.fixtures.as_ref().map(|dir| Self::normalize_path(&root.join(dir)));
        self.capture = self.capture.as_ref().map(|dir| Self::normalize_path(&root.join(dir)));
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate field values that serde alone cannot check
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.notion.page_size) {
            bail!(ConfigError::invalid("notion.page_size", "must be between 1 and 100"));
        }

        if self.notion.timeout_secs == 0 {
            bail!(ConfigError::invalid("notion.timeout_secs", "must be greater than 0"));
        }

        if !self.notion.api_url.starts_with("http") {
            bail!(ConfigError::invalid(
                "notion.api_url",
                "must start with http:// or https://"
            ));
        }

        let scheme = &self.site.mobile_scheme;
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            bail!(ConfigError::invalid(
                "site.mobile_scheme",
                format!("`{scheme}` is not a valid URI scheme")
            ));
        }

        if self.build.output == self.build.static_dir {
            bail!(ConfigError::invalid(
                "build.output",
                "must differ from build.static_dir"
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
