//! Component-scoped stylesheets and scripts.
//!
//! A component `nav.html` may ship `nav.css` and/or `nav.js` next to it.
//! While expanding a document the include resolver records which of those
//! exist; [`inject_assets`] then adds one reference per asset:
//!
//! ```text
//! <link rel="stylesheet" href="@styles/nav.css">   before </head>
//! <script src="@scripts/nav.js"></script>          before </body>
//! ```
//!
//! References stay virtual until the path resolution pass.

use super::pattern::{self, Region};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

impl AssetKind {
    pub const ALL: [Self; 2] = [Self::Stylesheet, Self::Script];

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::Script => "js",
        }
    }

    /// Top-level output directory the asset is copied into.
    pub const fn output_dir(self) -> &'static str {
        match self {
            Self::Stylesheet => "styles",
            Self::Script => "scripts",
        }
    }

    /// File name of component `name`'s asset of this kind.
    pub fn file_name(self, name: &str) -> String {
        format!("{name}.{}", self.extension())
    }

    /// Sibling asset path of a component, e.g. `components/nav.css`.
    pub fn sibling_of(self, components_dir: &Path, name: &str) -> PathBuf {
        components_dir.join(self.file_name(name))
    }

    /// Virtual reference used in the injected tag, e.g. `@styles/nav.css`.
    pub fn virtual_href(self, name: &str) -> String {
        format!("@{}/{}", self.output_dir(), self.file_name(name))
    }
}

/// Assets discovered while expanding one document, ordered by component name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredAssets(BTreeSet<(String, AssetKind)>);

impl DiscoveredAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, kind: AssetKind) {
        self.0.insert((name.to_owned(), kind));
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AssetKind)> {
        self.0.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    fn names_of(&self, kind: AssetKind) -> impl Iterator<Item = &str> {
        self.iter().filter(move |(_, k)| *k == kind).map(|(name, _)| name)
    }
}

/// Record every sibling asset that exists next to component `name`.
pub fn discover_component_assets(components_dir: &Path, name: &str, found: &mut DiscoveredAssets) {
    for kind in AssetKind::ALL {
        if kind.sibling_of(components_dir, name).is_file() {
            found.insert(name, kind);
        }
    }
}

/// Inject references for every discovered asset.
///
/// Returns the document unchanged when nothing was discovered. A missing
/// `</head>` or `</body>` skips the injection for that kind.
pub fn inject_assets(html: String, assets: &DiscoveredAssets) -> String {
    if assets.is_empty() {
        return html;
    }

    let links: String = assets
        .names_of(AssetKind::Stylesheet)
        .map(|name| {
            format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                AssetKind::Stylesheet.virtual_href(name)
            )
        })
        .collect();
    let scripts: String = assets
        .names_of(AssetKind::Script)
        .map(|name| {
            format!(
                "<script src=\"{}\"></script>\n",
                AssetKind::Script.virtual_href(name)
            )
        })
        .collect();

    let html = inject(html, Region::Head, &links);
    inject(html, Region::Body, &scripts)
}

fn inject(html: String, region: Region, tags: &str) -> String {
    if tags.is_empty() {
        return html;
    }
    pattern::insert_before_close(&html, region, tags).unwrap_or(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = "<html><head><title>t</title></head><body><p>x</p></body></html>";

    #[test]
    fn test_virtual_href() {
        assert_eq!(AssetKind::Stylesheet.virtual_href("nav"), "@styles/nav.css");
        assert_eq!(AssetKind::Script.virtual_href("nav"), "@scripts/nav.js");
    }

    #[test]
    fn test_inject_two_stylesheets() {
        let mut assets = DiscoveredAssets::new();
        assets.insert("nav", AssetKind::Stylesheet);
        assets.insert("footer", AssetKind::Stylesheet);

        let out = inject_assets(DOC.to_string(), &assets);
        assert_eq!(out.matches("<link rel=\"stylesheet\"").count(), 2);
        assert!(out.contains(
            "<link rel=\"stylesheet\" href=\"@styles/footer.css\">\n\
             <link rel=\"stylesheet\" href=\"@styles/nav.css\">\n</head>"
        ));
        assert!(!out.contains("<script"));
    }

    #[test]
    fn test_inject_script_before_body_close() {
        let mut assets = DiscoveredAssets::new();
        assets.insert("nav", AssetKind::Script);

        let out = inject_assets(DOC.to_string(), &assets);
        assert!(out.contains("<p>x</p><script src=\"@scripts/nav.js\"></script>\n</body>"));
    }

    #[test]
    fn test_inject_nothing_is_noop() {
        let out = inject_assets(DOC.to_string(), &DiscoveredAssets::new());
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_inject_without_head_keeps_document() {
        let mut assets = DiscoveredAssets::new();
        assets.insert("nav", AssetKind::Stylesheet);
        let out = inject_assets("<p>fragment</p>".to_string(), &assets);
        assert_eq!(out, "<p>fragment</p>");
    }

    #[test]
    fn test_discover_component_assets() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("nav.html"), "<nav></nav>").unwrap();
        std::fs::write(dir.path().join("nav.css"), "nav {}").unwrap();

        let mut found = DiscoveredAssets::new();
        discover_component_assets(dir.path(), "nav", &mut found);
        let items: Vec<_> = found.iter().collect();
        assert_eq!(items, vec![("nav", AssetKind::Stylesheet)]);
    }
}
