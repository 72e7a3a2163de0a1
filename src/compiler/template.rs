//! Merging page/post fragments into the shared base template.
//!
//! ```text
//! fragment                      base template
//! ┌──────────────────┐          ┌─────────────────────────────┐
//! │ <head> H </head> │ ──H────► │ <head> ... H </head>        │
//! │ <body> B </body> │ ──B────► │ <body> <!--include=         │
//! └──────────────────┘          │   "@content"--> → B </body> │
//!                               └─────────────────────────────┘
//! ```

use super::error::{ComposeError, StructuralWarning};
use super::pattern::{self, Region};
use crate::config::SiteConfig;
use std::path::{Component, Path};

/// Where a source HTML file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Under the pages tree, with the id of its page directory.
    Page(String),
    /// Under the posts tree, with the id of its post directory.
    Post(String),
    /// Anywhere else; the file is already a complete document.
    Other,
}

impl Origin {
    /// Classify `path` against the configured pages and posts roots.
    pub fn classify(path: &Path, config: &SiteConfig) -> Self {
        if let Ok(rel) = path.strip_prefix(&config.dirs.posts) {
            Self::Post(child_dir_name(rel))
        } else if let Ok(rel) = path.strip_prefix(&config.dirs.pages) {
            Self::Page(child_dir_name(rel))
        } else {
            Self::Other
        }
    }

    /// Page identifier used for `data-page` matching; empty for `Other`.
    pub fn page_id(&self) -> &str {
        match self {
            Self::Page(id) | Self::Post(id) => id,
            Self::Other => "",
        }
    }

    pub const fn uses_template(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Name of the directory directly below the tree root that contains `rel`.
///
/// `hello-world/index.html` → `hello-world`; a file at the root has none.
fn child_dir_name(rel: &Path) -> String {
    let mut components = rel.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(dir)), Some(_)) => dir.to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

/// Result of merging a fragment into the base template.
#[derive(Debug)]
pub struct Merged {
    pub html: String,
    pub warnings: Vec<StructuralWarning>,
}

/// Splice `fragment`'s head and body into `base`.
///
/// - head content is appended before the base's `</head>`
/// - body content replaces the `@content` sentinel
///
/// A fragment without a `<body>` region is not an error: the sentinel is
/// dropped and a warning is returned instead.
pub fn merge_fragment(fragment: &str, base: &str, base_path: &Path) -> Result<Merged, ComposeError> {
    let mut warnings = Vec::new();

    let mut html = match pattern::extract_region(fragment, Region::Body) {
        Some(body) => pattern::replace_sentinel(base, body)
            .ok_or_else(|| ComposeError::MissingPlaceholder(base_path.to_path_buf()))?,
        None => {
            warnings.push(StructuralWarning::MissingBodyRegion);
            pattern::replace_sentinel(base, "").unwrap_or_else(|| base.to_owned())
        }
    };

    if let Some(head) = pattern::extract_region(fragment, Region::Head)
        && let Some(merged) = pattern::insert_before_close(&html, Region::Head, head)
    {
        html = merged;
    }

    Ok(Merged { html, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BASE: &str = "<html><head><meta charset=\"utf-8\"></head>\
                        <body><nav></nav><!-- include=\"@content\" --><footer></footer></body></html>";

    #[test]
    fn test_merge_head_and_body() {
        let fragment = "<head><title>A</title></head><body><p>B</p></body>";
        let merged = merge_fragment(fragment, BASE, Path::new("base.html")).unwrap();
        assert_eq!(
            merged.html,
            "<html><head><meta charset=\"utf-8\"><title>A</title></head>\
             <body><nav></nav><p>B</p><footer></footer></body></html>"
        );
        assert!(merged.warnings.is_empty());
    }

    #[test]
    fn test_merge_into_empty_head() {
        let base = "<head></head><body><!-- include=\"@content\" --></body>";
        let fragment = "<head><title>A</title></head><body><p>B</p></body>";
        let merged = merge_fragment(fragment, base, Path::new("base.html")).unwrap();
        assert_eq!(merged.html, "<head><title>A</title></head><body><p>B</p></body>");
    }

    #[test]
    fn test_merge_without_head() {
        let merged = merge_fragment("<body>x</body>", BASE, Path::new("base.html")).unwrap();
        assert!(merged.html.starts_with("<html><head><meta charset=\"utf-8\"></head>"));
        assert!(merged.html.contains("<nav></nav>x<footer>"));
    }

    #[test]
    fn test_merge_without_body_drops_sentinel() {
        let merged = merge_fragment("<head><title>A</title></head>", BASE, Path::new("b")).unwrap();
        assert!(!merged.html.contains("@content"));
        assert!(merged.html.contains("<title>A</title></head>"));
        assert_eq!(merged.warnings, vec![StructuralWarning::MissingBodyRegion]);
    }

    #[test]
    fn test_merge_without_body_or_sentinel() {
        let base = "<head></head><body><p>static</p></body>";
        let merged = merge_fragment("<head><title>A</title></head>", base, Path::new("b")).unwrap();
        assert_eq!(merged.html, "<head><title>A</title></head><body><p>static</p></body>");
        assert_eq!(merged.warnings, vec![StructuralWarning::MissingBodyRegion]);
        assert_eq!(
            merged.warnings[0].to_string(),
            "fragment has no <body> region, body merge skipped"
        );
    }

    #[test]
    fn test_missing_placeholder() {
        let err = merge_fragment("<body>x</body>", "<head></head><body></body>", Path::new("base.html"))
            .unwrap_err();
        assert!(matches!(err, ComposeError::MissingPlaceholder(p) if p == PathBuf::from("base.html")));
    }

    #[test]
    fn test_child_dir_name() {
        assert_eq!(child_dir_name(Path::new("hello-world/index.html")), "hello-world");
        assert_eq!(child_dir_name(Path::new("hello-world/img/a.html")), "hello-world");
        assert_eq!(child_dir_name(Path::new("404.html")), "");
    }

    #[test]
    fn test_classify() {
        let mut config = SiteConfig::default();
        config.dirs.pages = PathBuf::from("/site/src/pages");
        config.dirs.posts = PathBuf::from("/site/src/posts");

        let origin = Origin::classify(Path::new("/site/src/posts/hello/index.html"), &config);
        assert_eq!(origin, Origin::Post("hello".into()));
        assert_eq!(origin.page_id(), "hello");
        assert!(origin.uses_template());

        let origin = Origin::classify(Path::new("/site/src/pages/about/index.html"), &config);
        assert_eq!(origin, Origin::Page("about".into()));

        let origin = Origin::classify(Path::new("/site/src/assets/x.html"), &config);
        assert_eq!(origin, Origin::Other);
        assert_eq!(origin.page_id(), "");
        assert!(!origin.uses_template());
    }
}
