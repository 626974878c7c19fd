//! Content discovery and manifest generation.
//!
//! Stage 1 of the build. Reads the markdown pages and site config from the
//! content root and produces a [`SiteManifest`] that `generate` renders.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml            # Site configuration (optional)
//! ├── 010-index.md           # Home page (slug `index` → index.html)
//! ├── 020-sluzby.md          # Content page (numbered = appears in nav)
//! ├── 030-galerie.md         # Body `@gallery` → photo gallery page
//! ├── 040-certifikaty.md     # Body `@certificates` → certificates page
//! ├── 050-facebook.md        # Body is a URL → external nav link
//! └── cenik.md               # Unnumbered = built but hidden from nav
//! ```
//!
//! ## Page Kinds
//!
//! The body decides what a page is. A body that is a single `http(s)://` line
//! is an external link; a single `@directive` line embeds a gallery; anything
//! else is markdown.
//!
//! ## Validation
//!
//! - No two numbered pages share a number
//! - No two pages share a slug
//! - Only `@gallery` and `@certificates` are known directives

use crate::config::{self, SiteConfig};
use crate::naming::parse_page_name;
use crate::types::{GalleryKind, NavItem, Page, PageKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Duplicate page number {0}: {1} and {2}")]
    DuplicateNumber(u32, PathBuf, PathBuf),
    #[error("Duplicate page slug '{0}' in {1}")]
    DuplicateSlug(String, PathBuf),
    #[error("Unknown directive '{0}' in {1}")]
    UnknownDirective(String, PathBuf),
    #[error("Cannot derive a page slug from file name: {0}")]
    InvalidName(PathBuf),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct SiteManifest {
    pub navigation: Vec<NavItem>,
    pub pages: Vec<Page>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<SiteManifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;
    let pages = parse_pages(root, &config)?;
    let navigation = build_navigation(&pages);

    Ok(SiteManifest {
        navigation,
        pages,
        config,
    })
}

/// Parse all markdown files in the root directory into pages, sorted by
/// number (unnumbered last, then by slug).
fn parse_pages(root: &Path, config: &SiteConfig) -> Result<Vec<Page>, ScanError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    md_files.sort();

    let mut numbers: BTreeMap<u32, PathBuf> = BTreeMap::new();
    let mut slugs: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut pages = Vec::new();

    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed =
            parse_page_name(&stem).ok_or_else(|| ScanError::InvalidName(md_path.clone()))?;

        if let Some(num) = parsed.number
            && let Some(previous) = numbers.insert(num, md_path.clone())
        {
            return Err(ScanError::DuplicateNumber(num, previous, md_path.clone()));
        }
        if slugs.insert(parsed.slug.clone(), md_path.clone()).is_some() {
            return Err(ScanError::DuplicateSlug(parsed.slug, md_path.clone()));
        }

        let content = fs::read_to_string(md_path)?;
        let kind = classify_body(&content, md_path)?;

        let title = match kind {
            PageKind::Link => parsed.link_title.clone(),
            PageKind::Gallery(gallery) => config.gallery_for(gallery).title.clone(),
            PageKind::Content => {
                first_heading(&content).unwrap_or_else(|| parsed.link_title.clone())
            }
        };
        debug!(file = %md_path.display(), slug = %parsed.slug, ?kind, "page");

        pages.push(Page {
            title,
            link_title: parsed.link_title,
            slug: parsed.slug,
            body: content,
            in_nav: parsed.number.is_some(),
            sort_key: parsed.number.unwrap_or(u32::MAX),
            kind,
            source: md_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });
    }

    pages.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.slug.cmp(&b.slug)));
    Ok(pages)
}

/// Decide what a page is from its body.
fn classify_body(content: &str, path: &Path) -> Result<PageKind, ScanError> {
    let trimmed = content.trim();
    if trimmed.contains('\n') {
        return Ok(PageKind::Content);
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(PageKind::Link);
    }
    if let Some(directive) = trimmed.strip_prefix('@') {
        return match directive {
            "gallery" => Ok(PageKind::Gallery(GalleryKind::Photos)),
            "certificates" => Ok(PageKind::Gallery(GalleryKind::Certificates)),
            other => Err(ScanError::UnknownDirective(
                other.to_string(),
                path.to_path_buf(),
            )),
        };
    }
    Ok(PageKind::Content)
}

fn first_heading(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
}

fn build_navigation(pages: &[Page]) -> Vec<NavItem> {
    pages
        .iter()
        .filter(|p| p.in_nav)
        .map(|p| {
            let external = p.kind == PageKind::Link;
            NavItem {
                title: p.link_title.clone(),
                href: p.href(),
                slug: if external {
                    String::new()
                } else {
                    p.slug.clone()
                },
                external,
            }
        })
        .collect()
}
