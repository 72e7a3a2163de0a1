//! Virtual path resolution over the finished output tree.
//!
//! Authored content refers to other output files through a small virtual
//! namespace. Once every file has been written, each `.html`, `.css` and
//! `.js` file is rewritten so the references become paths relative to the
//! file's own directory.
//!
//! | Reference                | Output target        |
//! |--------------------------|----------------------|
//! | `@assets/logo.png`       | `assets/logo.png`    |
//! | `@posts/hello/`          | `posts/hello/`       |
//! | `@styles/nav.css`        | `styles/nav.css`     |
//! | `@scripts/nav.js`        | `scripts/nav.js`     |
//! | `@pages/index`           | `index.html`         |
//! | `@pages/index/style.css` | `style.css`          |
//! | `@pages/about/index.html`| `about/index.html`   |
//!
//! From `posts/hello/index.html`, `@assets/logo.png` becomes
//! `../../assets/logo.png`; from `index.html` it stays `assets/logo.png`.
//! Resolved output carries no virtual markers, so a second run is a no-op.

use super::collect_all_files;
use super::pattern;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions of files whose content is rewritten.
const REWRITTEN_EXTENSIONS: &[&str] = &["html", "css", "js"];

/// The index page directory, flattened into the output root.
const INDEX_PAGE: &str = "index";

/// Rewrite virtual references in every eligible file under `output_root`.
///
/// Returns the number of files that changed.
pub fn resolve_output_tree(output_root: &Path) -> Result<usize> {
    let files: Vec<PathBuf> = collect_all_files(output_root)
        .into_iter()
        .filter(|path| is_rewritten(path))
        .collect();

    let changed = files
        .par_iter()
        .map(|path| resolve_file(path, output_root))
        .collect::<Result<Vec<bool>>>()?;

    Ok(changed.into_iter().filter(|c| *c).count())
}

fn is_rewritten(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| REWRITTEN_EXTENSIONS.contains(&ext))
}

/// Rewrite one file in place. Returns whether its content changed.
pub fn resolve_file(path: &Path, output_root: &Path) -> Result<bool> {
    let content = fs::read(path)
        .with_context(|| format!("Failed to read output file: {}", path.display()))?;

    let file_dir = path
        .strip_prefix(output_root)
        .ok()
        .and_then(Path::parent)
        .unwrap_or(Path::new(""));

    match resolve_content(&content, file_dir) {
        Cow::Borrowed(_) => Ok(false),
        Cow::Owned(resolved) => {
            fs::write(path, resolved)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            Ok(true)
        }
    }
}

/// Rewrite virtual references in `content` for a file living in `file_dir`
/// (relative to the output root).
///
/// Content is treated as bytes; only the references themselves must be text.
pub fn resolve_content<'a>(content: &'a [u8], file_dir: &Path) -> Cow<'a, [u8]> {
    pattern::map_virtual_refs(content, |namespace, suffix| {
        relative_to(&virtual_target(namespace, suffix), file_dir)
    })
}

/// Output-root-relative target of a virtual reference.
pub fn virtual_target(namespace: &str, suffix: &str) -> String {
    match namespace {
        "pages" => page_target(suffix).to_owned(),
        _ => format!("{namespace}/{suffix}"),
    }
}

/// `@pages` flattening: the index page lives at the output root.
fn page_target(suffix: &str) -> &str {
    match suffix.split_once('/') {
        Some((INDEX_PAGE, "")) => "index.html",
        Some((INDEX_PAGE, rest)) => rest,
        None if suffix.is_empty() || suffix == INDEX_PAGE => "index.html",
        _ => suffix,
    }
}

/// Express output-root-relative `target` relative to `file_dir`, using `/`.
pub fn relative_to(target: &str, file_dir: &Path) -> String {
    if file_dir.as_os_str().is_empty() {
        return target.to_owned();
    }

    let relative = pathdiff::diff_paths(target, file_dir).unwrap_or_else(|| PathBuf::from(target));
    let mut relative = relative.to_string_lossy().replace('\\', "/");
    if relative.is_empty() {
        relative.push('.');
    }
    if target.ends_with('/') && !relative.ends_with('/') {
        relative.push('/');
    }
    relative
}
