//! Recursive component expansion.
//!
//! `<!-- include="@components/NAME" -->` is replaced by the fully expanded
//! content of `NAME.html` from the components directory. Nested includes
//! inside a component resolve against the same directory.
//!
//! # Cycle detection
//!
//! The context keeps the component paths currently on the expansion stack.
//! A path is removed again when its expansion returns, so the same component
//! may appear any number of times in sibling branches; only a component
//! reaching itself through its own lineage is rejected.

use super::assets::{DiscoveredAssets, discover_component_assets};
use super::data_page::rewrite_data_page;
use super::error::ComposeError;
use super::pattern;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const COMPONENTS_PREFIX: &str = "@components/";

/// Transient state for expanding one top-level document.
#[derive(Debug)]
pub struct ExpansionContext<'a> {
    components_dir: &'a Path,
    /// Page/post the document belongs to; empty when not applicable.
    page_id: &'a str,
    /// Components on the current expansion stack.
    visited: HashSet<PathBuf>,
    assets: DiscoveredAssets,
}

impl<'a> ExpansionContext<'a> {
    pub fn new(components_dir: &'a Path, page_id: &'a str) -> Self {
        Self {
            components_dir,
            page_id,
            visited: HashSet::new(),
            assets: DiscoveredAssets::new(),
        }
    }

    /// Expand every component directive in `text`.
    ///
    /// `@content` and directives outside the `@components/` namespace are
    /// copied through verbatim.
    pub fn expand(&mut self, text: &str) -> Result<String, ComposeError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for directive in pattern::find_directives(text) {
            out.push_str(&text[last..directive.range.start]);
            match component_name(directive.target) {
                Some(name) => out.push_str(&self.expand_component(name)?),
                None => out.push_str(&text[directive.range.clone()]),
            }
            last = directive.range.end;
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Assets discovered over the whole expansion.
    pub fn into_assets(self) -> DiscoveredAssets {
        self.assets
    }

    fn expand_component(&mut self, name: &str) -> Result<String, ComposeError> {
        let path = self.components_dir.join(format!("{name}.html"));
        if self.visited.contains(&path) {
            return Err(ComposeError::CircularInclude(name.to_owned()));
        }

        let content = fs::read_to_string(&path).map_err(|source| ComposeError::ComponentRead {
            name: name.to_owned(),
            path: path.clone(),
            source,
        })?;

        self.visited.insert(path.clone());
        discover_component_assets(self.components_dir, name, &mut self.assets);
        let expanded = self.expand(&content);
        self.visited.remove(&path);

        Ok(rewrite_data_page(&expanded?, self.page_id))
    }
}

/// Component name of an include target, e.g. `@components/nav.html` → `nav`.
pub fn component_name(target: &str) -> Option<&str> {
    let name = target.strip_prefix(COMPONENTS_PREFIX)?;
    let name = name.strip_suffix(".html").unwrap_or(name);
    (!name.is_empty()).then_some(name)
}
