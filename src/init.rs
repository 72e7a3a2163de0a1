//! Site initialization module.
//!
//! Creates a new site directory with a default configuration and a small
//! starter site that builds out of the box.

use crate::{config::SiteConfig, debug, log};
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

/// Default config filename
const CONFIG_FILE: &str = "velcro.toml";

/// Allowed site names
static RE_SITE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Starter site, relative to the site root. Matches the default `[dirs]`.
const STARTER_FILES: &[(&str, &str)] = &[
    ("src/base.html", include_str!("embed/init/base.html")),
    ("src/pages/index/index.html", include_str!("embed/init/pages/index/index.html")),
    (
        "src/posts/example-post-one/index.html",
        include_str!("embed/init/posts/example-post-one/index.html"),
    ),
    (
        "src/posts/example-post-one/index.js",
        include_str!("embed/init/posts/example-post-one/index.js"),
    ),
    (
        "src/posts/example-post-one/preload.js",
        include_str!("embed/init/posts/example-post-one/preload.js"),
    ),
    ("src/components/nav.html", include_str!("embed/init/components/nav.html")),
    ("src/components/nav.css", include_str!("embed/init/components/nav.css")),
    ("src/styles/main.css", include_str!("embed/init/styles/main.css")),
    ("src/scripts/index.js", include_str!("embed/init/scripts/index.js")),
];

/// Empty directories the starter site expects
const STARTER_DIRS: &[&str] = &["src/assets"];

/// Create a new site named `name` at `config.root`
pub fn new_site(config: &SiteConfig, name: &str) -> Result<()> {
    if !RE_SITE_NAME.is_match(name) {
        bail!("Invalid site name `{name}`: use only A-Z, a-z, 0-9, `-` and `_`");
    }

    let root = &config.root;
    if root.exists() {
        bail!("Path `{}` already exists", root.display());
    }

    log!("init"; "creating {}", root.display());
    init_site_structure(root)?;
    init_default_config(root)?;
    init_ignored_files(root, &config.output_dir)?;

    log!("init"; "getting started:");
    log!("init"; "1. cd ./{}", name);
    log!("init"; "2. velcro build");
    log!("init"; "3. open {}/index.html", default_output_name());

    Ok(())
}

fn default_output_name() -> String {
    SiteConfig::default().output_dir.display().to_string()
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)
        .with_context(|| format!("Failed to write {CONFIG_FILE}"))?;
    Ok(())
}

/// Write the starter site
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in STARTER_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    for (rel, content) in STARTER_FILES {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        debug!("init"; "{}", rel);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Ignore the output directory in `.gitignore`
fn init_ignored_files(root: &Path, output: &Path) -> Result<()> {
    let output = output.strip_prefix(root).unwrap_or(output);
    let content = format!("/{}/\n", output.display());

    let path = root.join(".gitignore");
    if !path.exists() {
        fs::write(&path, content)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
