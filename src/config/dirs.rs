//! `[dirs]` section configuration.
//!
//! Source directories of the site, relative to the site root until
//! [`SiteConfig::update_with_cli`](super::SiteConfig::update_with_cli)
//! makes them absolute.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[dirs]` section in velcro.toml.
///
/// # Example
/// ```toml
/// [dirs]
/// pages = "src/pages"
/// posts = "src/posts"
/// components = "src/components"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct DirsConfig {
    /// Page fragments; `index/` is flattened into the output root.
    #[serde(default = "defaults::dirs::pages")]
    #[educe(Default = defaults::dirs::pages())]
    pub pages: PathBuf,

    /// One directory per post.
    #[serde(default = "defaults::dirs::posts")]
    #[educe(Default = defaults::dirs::posts())]
    pub posts: PathBuf,

    /// Static files copied to `output/assets`.
    #[serde(default = "defaults::dirs::assets")]
    #[educe(Default = defaults::dirs::assets())]
    pub assets: PathBuf,

    /// Global stylesheets copied to `output/styles`.
    #[serde(default = "defaults::dirs::styles")]
    #[educe(Default = defaults::dirs::styles())]
    pub styles: PathBuf,

    /// Global scripts copied to `output/scripts`.
    #[serde(default = "defaults::dirs::scripts")]
    #[educe(Default = defaults::dirs::scripts())]
    pub scripts: PathBuf,

    /// Reusable HTML components with optional co-located `.css`/`.js`.
    #[serde(default = "defaults::dirs::components")]
    #[educe(Default = defaults::dirs::components())]
    pub components: PathBuf,
}

impl DirsConfig {
    /// Every source directory with its config key, for validation messages.
    pub fn named(&self) -> [(&'static str, &Path); 6] {
        [
            ("pages", self.pages.as_path()),
            ("posts", self.posts.as_path()),
            ("assets", self.assets.as_path()),
            ("styles", self.styles.as_path()),
            ("scripts", self.scripts.as_path()),
            ("components", self.components.as_path()),
        ]
    }

    pub(super) fn for_each_mut(&mut self, mut f: impl FnMut(&mut PathBuf)) {
        for dir in [
            &mut self.pages,
            &mut self.posts,
            &mut self.assets,
            &mut self.styles,
            &mut self.scripts,
            &mut self.components,
        ] {
            f(dir);
        }
    }
}
