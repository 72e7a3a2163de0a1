//! Site building orchestration.
//!
//! Runs the build stages in a fixed order; the first failing file aborts
//! the whole build.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── posts            posts/NAME/**      → output/posts/NAME/**
//!     ├── assets           assets/**          → output/assets/**
//!     ├── scripts          scripts/**         → output/scripts/**
//!     ├── styles           styles/**          → output/styles/**
//!     ├── pages            pages/index/**     → output/**
//!     │                    pages/NAME/**      → output/NAME/**
//!     │
//!     ├── component assets components/X.css   → output/styles/X.css
//!     │                    components/X.js    → output/scripts/X.js
//!     │
//!     └── resolve          @namespace/...     → relative paths, in place
//! ```
//!
//! Files inside a stage are independent and processed in parallel; the
//! assets they discover are merged once the stage has finished.

use crate::{
    compiler::{
        AssetKind, DiscoveredAssets, collect_all_files, process_file,
        virtual_path::resolve_output_tree,
    },
    config::SiteConfig,
    debug, log,
};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// The pages directory flattened into the output root.
const INDEX_PAGE: &str = "index";

/// One source file and where it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    src: PathBuf,
    dst: PathBuf,
}

/// Build the entire site.
///
/// If `config.clean` is true, clears the output directory first.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let result = run_stages(config);
    if let Err(err) = &result {
        log!("error"; "build failed: {:#}", err);
        return Err(anyhow!("Build failed"));
    }
    result
}

fn run_stages(config: &SiteConfig) -> Result<()> {
    let output = &config.output_dir;
    prepare_output(output, config.clean)?;

    let mut discovered = DiscoveredAssets::new();

    discovered.extend(run_stage("posts", post_jobs(config)?, config)?);
    for (stage, src) in [
        ("assets", &config.dirs.assets),
        ("scripts", &config.dirs.scripts),
        ("styles", &config.dirs.styles),
    ] {
        discovered.extend(run_stage(stage, tree_jobs(src, &output.join(stage)), config)?);
    }
    discovered.extend(run_stage("pages", page_jobs(config)?, config)?);

    copy_component_assets(&discovered, config)?;

    let resolved = resolve_output_tree(output)?;
    log!("resolve"; "rewrote virtual paths in {} files", resolved);

    log_build_result(output)
}

/// Ensure the output directory exists, clearing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Process every job of one stage, returning the union of discovered assets.
fn run_stage(stage: &str, jobs: Vec<Job>, config: &SiteConfig) -> Result<DiscoveredAssets> {
    if jobs.is_empty() {
        debug!(stage; "nothing to do");
        return Ok(DiscoveredAssets::new());
    }

    check_collisions(&jobs)?;
    log!(stage; "processing {} files", jobs.len());
    let found = jobs
        .par_iter()
        .map(|job| process_file(&job.src, &job.dst, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(found.into_iter().fold(DiscoveredAssets::new(), |mut all, assets| {
        all.extend(assets);
        all
    }))
}

/// Reject two sources mapping to the same output file.
fn check_collisions(jobs: &[Job]) -> Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        if let Some(first) = seen.insert(job.dst.as_path(), job.src.as_path()) {
            bail!(
                "`{}` and `{}` both write `{}`",
                first.display(),
                job.src.display(),
                job.dst.display()
            );
        }
    }
    Ok(())
}

// ============================================================================
// Job collection
// ============================================================================

/// Mirror every file under `src` into `dst`. A missing `src` yields no jobs.
fn tree_jobs(src: &Path, dst: &Path) -> Vec<Job> {
    if !src.is_dir() {
        return Vec::new();
    }
    collect_all_files(src)
        .into_iter()
        .filter_map(|file| {
            let rel = file.strip_prefix(src).ok()?.to_path_buf();
            Some(Job {
                dst: dst.join(rel),
                src: file,
            })
        })
        .collect()
}

/// Immediate children of `dir`, sorted by name, skipping drafts.
fn published_children(dir: &Path, config: &SiteConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut children = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if path.is_dir() && config.is_draft(name) {
            debug!("draft"; "skipping {}", path.display());
            continue;
        }
        children.push(path);
    }
    children.sort();
    Ok(children)
}

/// `posts/NAME/**` → `output/posts/NAME/**`; loose files are ignored.
fn post_jobs(config: &SiteConfig) -> Result<Vec<Job>> {
    let output = config.output_dir.join("posts");
    Ok(published_children(&config.dirs.posts, config)?
        .into_iter()
        .filter(|path| path.is_dir())
        .flat_map(|post| {
            let name = post.file_name().map(PathBuf::from).unwrap_or_default();
            tree_jobs(&post, &output.join(name))
        })
        .collect())
}

/// `pages/index/**` → `output/**`, `pages/NAME/**` → `output/NAME/**`,
/// loose files → output root.
fn page_jobs(config: &SiteConfig) -> Result<Vec<Job>> {
    let output = &config.output_dir;
    let mut jobs = Vec::new();

    for child in published_children(&config.dirs.pages, config)? {
        let Some(name) = child.file_name() else {
            continue;
        };
        if child.is_dir() {
            let dst = if name == INDEX_PAGE {
                output.to_path_buf()
            } else {
                output.join(name)
            };
            jobs.extend(tree_jobs(&child, &dst));
        } else if name != ".DS_Store" {
            jobs.push(Job {
                dst: output.join(name),
                src: child,
            });
        }
    }

    Ok(jobs)
}

// ============================================================================
// Component assets
// ============================================================================

/// Copy the stylesheets/scripts of every component used by any document.
fn copy_component_assets(found: &DiscoveredAssets, config: &SiteConfig) -> Result<()> {
    if found.is_empty() {
        return Ok(());
    }

    log!("components"; "copying {} component assets", found.len());
    for (name, kind) in found.iter() {
        let src = kind.sibling_of(&config.dirs.components, name);
        let dst = component_asset_dest(&config.output_dir, name, kind);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("copy"; "{}", src.display());
        fs::copy(&src, &dst).with_context(|| {
            format!("Failed to copy component asset {}", src.display())
        })?;
    }
    Ok(())
}

fn component_asset_dest(output: &Path, name: &str, kind: AssetKind) -> PathBuf {
    output.join(kind.output_dir()).join(kind.file_name(name))
}

/// Log build result based on output directory contents
fn log_build_result(output: &Path) -> Result<()> {
    let file_count = collect_all_files(output).len();

    if file_count == 0 {
        log!("warn"; "output is empty, check the [dirs] paths in velcro.toml");
    } else {
        log!("build"; "done, {} files in {}", file_count, output.display());
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
