//! Per-file composition pipeline.
//!
//! - **template**: merge page/post fragments into the base template
//! - **include**: expand component directives, detect cycles
//! - **data_page**: mark active navigation entries
//! - **assets**: inject component stylesheets and scripts
//! - **validate**: head/body balance diagnostics
//! - **virtual_path**: resolve `@namespace/...` references after the build
//!
//! # Flow
//!
//! ```text
//! source ──► merge_fragment() ──► expand() ──► inject_assets() ──► validate_structure()
//!  (.html)   (pages/posts only)   (recursive)                       (warnings only)
//!                                                     │
//!                                                     ▼
//!                                                output tree ──► resolve_output_tree()
//! ```

pub mod assets;
pub mod data_page;
pub mod error;
pub mod include;
pub mod pattern;
pub mod template;
pub mod validate;
pub mod virtual_path;

use crate::config::SiteConfig;
use crate::{debug, log};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use assets::{AssetKind, DiscoveredAssets};
pub use error::{ComposeError, StructuralWarning};
pub use template::Origin;

use assets::inject_assets;
use data_page::rewrite_data_page;
use include::ExpansionContext;
use template::merge_fragment;
use validate::validate_structure;

// ============================================================================
// Composition
// ============================================================================

/// A fully composed HTML document.
#[derive(Debug)]
pub struct Composed {
    pub html: String,
    pub assets: DiscoveredAssets,
    pub warnings: Vec<StructuralWarning>,
}

/// Compose one HTML source file.
///
/// Nothing is written here; on error the caller must not emit the file.
pub fn compose(source: &str, origin: &Origin, config: &SiteConfig) -> Result<Composed, ComposeError> {
    let mut warnings = Vec::new();

    let merged = if origin.uses_template() {
        let base_path = config.base_html.as_path();
        let base = fs::read_to_string(base_path)
            .map_err(|err| ComposeError::BaseTemplateRead(base_path.to_path_buf(), err))?;
        let merged = merge_fragment(source, &base, base_path)?;
        warnings.extend(merged.warnings);
        merged.html
    } else {
        source.to_owned()
    };

    let mut ctx = ExpansionContext::new(&config.dirs.components, origin.page_id());
    let expanded = ctx.expand(&merged)?;
    let assets = ctx.into_assets();
    // Base template and fragment markup; component output is already rewritten.
    let expanded = rewrite_data_page(&expanded, origin.page_id());

    let html = inject_assets(expanded, &assets);
    warnings.extend(validate_structure(&html));

    Ok(Composed {
        html,
        assets,
        warnings,
    })
}

// ============================================================================
// File processing
// ============================================================================

/// Process one source file into `dst`.
///
/// HTML goes through [`compose`]; anything else is copied verbatim.
/// Returns the assets discovered while composing.
pub fn process_file(src: &Path, dst: &Path, config: &SiteConfig) -> Result<DiscoveredAssets> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if !is_html(src) {
        debug!("copy"; "{}", src.display());
        fs::copy(src, dst).with_context(|| format!("Failed to copy {}", src.display()))?;
        return Ok(DiscoveredAssets::new());
    }

    debug!("compose"; "{}", src.display());
    let source = fs::read_to_string(src)
        .with_context(|| format!("Failed to read source file: {}", src.display()))?;
    let origin = Origin::classify(src, config);
    let composed = compose(&source, &origin, config)
        .with_context(|| format!("Failed to compose {}", src.display()))?;

    for warning in &composed.warnings {
        log!("warn"; "{}: {}", src.display(), warning);
    }

    fs::write(dst, &composed.html)
        .with_context(|| format!("Failed to write {}", dst.display()))?;
    Ok(composed.assets)
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all files from a directory recursively.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Minimal site: base template, one `nav` component with a stylesheet.
    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for sub in ["pages/about", "posts/hello", "components"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(
            root.join("base.html"),
            "<html><head><meta charset=\"utf-8\"></head>\
             <body><!-- include=\"@components/nav\" --><!-- include=\"@content\" --></body></html>",
        )
        .unwrap();
        fs::write(
            root.join("components/nav.html"),
            r#"<ul><li data-page="about">About</li><li data-page="hello">Hello</li></ul>"#,
        )
        .unwrap();
        fs::write(root.join("components/nav.css"), "ul {}").unwrap();

        let mut config = SiteConfig::default();
        config.base_html = root.join("base.html");
        config.dirs.pages = root.join("pages");
        config.dirs.posts = root.join("posts");
        config.dirs.components = root.join("components");
        (dir, config)
    }

    #[test]
    fn test_compose_post() {
        let (_dir, config) = site();
        let origin = Origin::Post("hello".into());
        let composed = compose(
            "<head><title>A</title></head><body><p>B</p></body>",
            &origin,
            &config,
        )
        .unwrap();

        assert_eq!(
            composed.html,
            "<html><head><meta charset=\"utf-8\"><title>A</title>\
             <link rel=\"stylesheet\" href=\"@styles/nav.css\">\n</head>\
             <body><ul><li>About</li><li class=\"active\">Hello</li></ul><p>B</p></body></html>"
        );
        assert_eq!(composed.assets.len(), 1);
        assert!(composed.warnings.is_empty());
    }

    #[test]
    fn test_compose_data_page_in_base_and_fragment() {
        let (_dir, config) = site();
        fs::write(
            &config.base_html,
            r#"<head></head><body><li data-page="about">A</li><!-- include="@content" --></body>"#,
        )
        .unwrap();

        let composed = compose(
            r#"<body><a data-page="blog">x</a></body>"#,
            &Origin::Page("about".into()),
            &config,
        )
        .unwrap();
        assert_eq!(
            composed.html,
            r#"<head></head><body><li class="active">A</li><a>x</a></body>"#
        );
    }

    #[test]
    fn test_compose_other_is_not_merged() {
        let (_dir, config) = site();
        let composed = compose("<p>standalone</p>", &Origin::Other, &config).unwrap();
        assert_eq!(composed.html, "<p>standalone</p>");
        assert_eq!(composed.warnings, vec![StructuralWarning::MissingHead]);
    }

    #[test]
    fn test_compose_missing_base_template() {
        let (_dir, mut config) = site();
        config.base_html = config.dirs.pages.join("missing.html");
        let err = compose("<body></body>", &Origin::Page("x".into()), &config).unwrap_err();
        assert!(matches!(err, ComposeError::BaseTemplateRead(..)));
    }

    #[test]
    fn test_process_file_cycle_writes_nothing() {
        let (dir, config) = site();
        fs::write(
            config.dirs.components.join("loop.html"),
            r#"<!-- include="@components/loop" -->"#,
        )
        .unwrap();
        let src = config.dirs.pages.join("about/index.html");
        fs::write(&src, r#"<body><!-- include="@components/loop" --></body>"#).unwrap();
        let dst = dir.path().join("out/about/index.html");

        let err = process_file(&src, &dst, &config).unwrap_err();
        assert!(format!("{err:#}").contains("circular include"));
        assert!(!dst.exists());
    }

    #[test]
    fn test_process_file_copies_non_html() {
        let (dir, config) = site();
        let src = config.dirs.posts.join("hello/data.bin");
        fs::write(&src, [0u8, 159, 146, 150]).unwrap();
        let dst = dir.path().join("out/posts/hello/data.bin");

        let assets = process_file(&src, &dst, &config).unwrap();
        assert!(assets.is_empty());
        assert_eq!(fs::read(&dst).unwrap(), vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn test_collect_all_files_skips_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/x.html"), "").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();

        let files = collect_all_files(dir.path());
        assert_eq!(files, vec![dir.path().join("a/x.html")]);
    }
}
