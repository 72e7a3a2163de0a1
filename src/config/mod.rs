//! Site configuration management for `velcro.toml`.
//!
//! # Keys
//!
//! | Key            | Purpose                                             |
//! |----------------|-----------------------------------------------------|
//! | `base_html`    | Base template pages and posts are merged into       |
//! | `output_dir`   | Where the composed site is written                  |
//! | `draft_prefix` | Post/page directories with this prefix are skipped  |
//! | `[dirs]`       | Source directories (pages, posts, components, ...)  |
//!
//! # Example
//!
//! ```toml
//! base_html = "src/base.html"
//! output_dir = "dist"
//! draft_prefix = "_"
//!
//! [dirs]
//! pages = "src/pages"
//! posts = "src/posts"
//! assets = "src/assets"
//! styles = "src/styles"
//! scripts = "src/scripts"
//! components = "src/components"
//! ```
//!
//! All paths are relative to the site root until [`SiteConfig::update_with_cli`]
//! resolves them; the descriptor is read-only for the rest of the build.

pub mod defaults;
mod dirs;
mod error;

pub use dirs::DirsConfig;
pub use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing velcro.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site root (set from the CLI)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Clear the output directory before building (set from the CLI)
    #[serde(skip)]
    pub clean: bool,

    /// Base template for pages and posts.
    #[serde(default = "defaults::base_html")]
    #[educe(Default = defaults::base_html())]
    pub base_html: PathBuf,

    /// Output directory.
    #[serde(default = "defaults::output_dir")]
    #[educe(Default = defaults::output_dir())]
    pub output_dir: PathBuf,

    /// Prefix marking draft post/page directories; empty disables drafts.
    #[serde(default = "defaults::draft_prefix")]
    #[educe(Default = defaults::draft_prefix())]
    pub draft_prefix: String,

    /// Source directories
    #[serde(default)]
    pub dirs: DirsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Whether a post/page directory name marks a draft.
    pub fn is_draft(&self, name: &str) -> bool {
        !self.draft_prefix.is_empty() && name.starts_with(&self.draft_prefix)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = match &cli.command {
            Commands::Init { name } => base.join(name),
            Commands::Build { .. } => base,
        };

        if let Commands::Build { build_args } = &cli.command {
            Self::update_option(&mut self.output_dir, build_args.output.as_ref());
            self.clean = build_args.clean;
        }

        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve all paths against `root` and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.base_html = Self::normalize_path(&root.join(&self.base_html));
        self.output_dir = Self::normalize_path(&root.join(&self.output_dir));
        self.dirs
            .for_each_mut(|dir| *dir = Self::normalize_path(&root.join(&*dir)));

        self.root = root;
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

    /// Validate configuration for a build
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found: {}", self.config_path.display());
        }

        if self.output_dir == self.root {
            bail!(ConfigError::Validation(
                "[output_dir] must not be the site root".into()
            ));
        }

        for (key, dir) in self.dirs.named() {
            if dir.starts_with(&self.output_dir) {
                bail!(ConfigError::Validation(format!(
                    "[dirs.{key}] must not be inside [output_dir]"
                )));
            }
        }

        let has_fragments = self.dirs.pages.exists() || self.dirs.posts.exists();
        if has_fragments && !self.base_html.is_file() {
            bail!(ConfigError::Validation(format!(
                "[base_html] `{}` not found",
                self.base_html.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
