//! Shared test utilities for the arbo-site test suite.
//!
//! Provides a fixture site on disk, real PNG bytes for probe tests, scripted
//! listing sources and probes for loader tests, and manifest lookups.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! let manifest = scan(&site.path().join("content")).unwrap();
//!
//! let gallery = find_page(&manifest, "galerie");
//! assert_eq!(nav_titles(&manifest), vec!["Index", "Sluzby", "Galerie", "Certifikaty", "Facebook"]);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::sync::Notify;

use crate::gallery::probe::{DimensionProbe, ProbeError};
use crate::gallery::source::{ListingSource, LoadError};
use crate::scan::SiteManifest;
use crate::types::{Dimensions, GalleryEntry, MediaKind, Page};

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a complete site in a temp directory:
///
/// ```text
/// content/
/// ├── config.toml
/// ├── 010-index.md          # home
/// ├── 020-sluzby.md
/// ├── 030-galerie.md        # @gallery
/// ├── 040-certifikaty.md    # @certificates
/// ├── 050-facebook.md       # external link
/// └── cenik.md              # hidden from nav
/// public/
/// ├── placeholder-image.png
/// ├── gallery/images/{strom.png 40x30, koruna.png 20x50}
/// ├── gallery/videos/kaceni.mp4
/// └── certificates/iso.png 30x40
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    std::fs::create_dir_all(&content).unwrap();

    std::fs::write(
        content.join("config.toml"),
        "[site]\ntitle = \"Arbo Test\"\nurl = \"https://arbo.example\"\n\n[gallery]\norder = \"newest\"\n",
    )
    .unwrap();
    std::fs::write(
        content.join("010-index.md"),
        "# Péče o stromy\n\nRizikové kácení a ořezy.",
    )
    .unwrap();
    std::fs::write(
        content.join("020-sluzby.md"),
        "# Naše služby\n\n- Kácení\n- Ořezy\n",
    )
    .unwrap();
    std::fs::write(content.join("030-galerie.md"), "@gallery\n").unwrap();
    std::fs::write(content.join("040-certifikaty.md"), "@certificates\n").unwrap();
    std::fs::write(
        content.join("050-facebook.md"),
        "https://facebook.com/arbo\n",
    )
    .unwrap();
    std::fs::write(content.join("cenik.md"), "# Ceník\n\nNa dotaz.").unwrap();

    let public = tmp.path().join("public");
    write_png(&public.join("placeholder-image.png"), 8, 6);
    write_png(&public.join("gallery/images/strom.png"), 40, 30);
    write_png(&public.join("gallery/images/koruna.png"), 20, 50);
    std::fs::create_dir_all(public.join("gallery/videos")).unwrap();
    std::fs::write(public.join("gallery/videos/kaceni.mp4"), b"not decoded").unwrap();
    write_png(&public.join("certificates/iso.png"), 30, 40);

    tmp
}

// =========================================================================
// Image bytes
// =========================================================================

/// Encode a blank RGB image of the given size as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Write a PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, png_bytes(width, height)).unwrap();
}

// =========================================================================
// Listing sources and probes
// =========================================================================

/// Listing entry for a site path; name is the last path segment.
pub fn entry(path: &str, kind: MediaKind) -> GalleryEntry {
    GalleryEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        size: 0,
        modified: DateTime::<Utc>::default(),
        kind,
    }
}

/// Listing source returning a fixed result. An error is handed out once.
pub struct StaticListing {
    entries: Vec<GalleryEntry>,
    error: Mutex<Option<LoadError>>,
}

impl StaticListing {
    pub fn ok(entries: Vec<GalleryEntry>) -> Self {
        Self {
            entries,
            error: Mutex::new(None),
        }
    }

    pub fn err(error: LoadError) -> Self {
        Self {
            entries: Vec::new(),
            error: Mutex::new(Some(error)),
        }
    }
}

#[async_trait]
impl ListingSource for StaticListing {
    async fn fetch(&self) -> Result<Vec<GalleryEntry>, LoadError> {
        match self.error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(self.entries.clone()),
        }
    }
}

/// Probe answering from a table; unknown sources fail with 404.
/// Records every call.
pub struct StaticProbe {
    sizes: HashMap<String, Dimensions>,
    calls: Mutex<Vec<String>>,
}

impl StaticProbe {
    pub fn new(sizes: &[(&str, Dimensions)]) -> Self {
        Self {
            sizes: sizes
                .iter()
                .map(|(src, dims)| (src.to_string(), *dims))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DimensionProbe for StaticProbe {
    async fn probe(&self, src: &str) -> Result<Dimensions, ProbeError> {
        self.calls.lock().unwrap().push(src.to_string());
        self.sizes
            .get(src)
            .copied()
            .ok_or(ProbeError::Status(404))
    }
}

/// Probe that blocks each source until the test releases it, so tests can
/// choose the completion order.
pub struct GatedProbe {
    gates: HashMap<String, Notify>,
    dims: Dimensions,
}

impl GatedProbe {
    pub fn new(srcs: &[&str], dims: Dimensions) -> Self {
        Self {
            gates: srcs.iter().map(|s| (s.to_string(), Notify::new())).collect(),
            dims,
        }
    }

    /// Let the probe for `src` complete. May be called before the probe runs.
    pub fn release(&self, src: &str) {
        self.gates[src].notify_one();
    }
}

#[async_trait]
impl DimensionProbe for GatedProbe {
    async fn probe(&self, src: &str) -> Result<Dimensions, ProbeError> {
        let gate = self.gates.get(src).ok_or(ProbeError::Status(404))?;
        gate.notified().await;
        Ok(self.dims)
    }
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a SiteManifest, slug: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// Navigation titles in order.
pub fn nav_titles(manifest: &SiteManifest) -> Vec<&str> {
    manifest
        .navigation
        .iter()
        .map(|n| n.title.as_str())
        .collect()
}
