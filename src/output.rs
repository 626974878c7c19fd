//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The primary display for every entity (page, listing entry, gallery slot) is
//! its positional index and title; file names and URLs follow as secondary
//! context on indented lines.
//!
//! # Output Format
//!
//! ## Scan (`check`)
//!
//! ```text
//! Pages
//!     001 Péče o stromy → index.html
//!         Source: 010-index.md
//!     003 Galerie → galerie.html (gallery)
//!         Source: 030-galerie.md
//!     005 Facebook → https://facebook.com/arbo (link)
//!         Source: 050-facebook.md
//!     006 Ceník → cenik.html (hidden)
//!         Source: cenik.md
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Listing
//!
//! ```text
//! Galerie: 3 items (2 images, 1 video)
//!     001 strom.jpg
//!         Path: /gallery/images/strom.jpg
//! ```
//!
//! ## Gallery load (`check-gallery`)
//!
//! ```text
//! Galerie ← http://127.0.0.1:4321/api/gallery-images
//!     resolved 002 /gallery/images/strom.jpg 1200×900
//!     001 kaceni.mp4 800×600 (video)
//!     002 strom.jpg 1200×900
//! Loaded 2 items
//! ```
//!
//! ## Generate (`build`)
//!
//! ```text
//! Galerie: 14 items
//! Certifikáty: 6 items
//! Copied 21 public files
//! Generated 9 files → dist
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::SiteConfig;
use crate::gallery::{GalleryView, LoadStatus};
use crate::generate::GenerateSummary;
use crate::scan::SiteManifest;
use crate::types::{DisplayItem, GalleryEntry, GalleryKind, MediaKind, PageKind};
use std::net::SocketAddr;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn gallery_title(config: &SiteConfig, kind: GalleryKind) -> &str {
    &config.gallery_for(kind).title
}

/// `W×H`, with a `(video)` marker for videos.
fn item_size(item: &DisplayItem) -> String {
    match item.kind {
        MediaKind::Video => format!("{}\u{d7}{} (video)", item.width, item.height),
        MediaKind::Image => format!("{}\u{d7}{}", item.width, item.height),
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the scanned pages and config.
pub fn format_scan_output(manifest: &SiteManifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    if manifest.pages.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, page) in manifest.pages.iter().enumerate() {
        let target = match &page.kind {
            PageKind::Link => format!("{} (link)", page.href()),
            PageKind::Gallery(_) => format!("{} (gallery)", page.output_file()),
            PageKind::Content => page.output_file(),
        };
        let hidden = if page.in_nav { "" } else { " (hidden)" };
        lines.push(format!(
            "{}{} {} \u{2192} {}{}",
            indent(1),
            format_index(i + 1),
            page.title,
            target,
            hidden
        ));
        lines.push(format!("{}Source: {}", indent(2), page.source));
    }

    if !manifest.pages.iter().any(|p| p.slug == "index") {
        lines.push(format!("{}Warning: no index page, the site has no home", indent(1)));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &SiteManifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Listing output
// ============================================================================

/// Format a listing: count by kind, then one entry per line.
pub fn format_listing(title: &str, entries: &[GalleryEntry]) -> Vec<String> {
    let videos = entries
        .iter()
        .filter(|e| e.kind == MediaKind::Video)
        .count();
    let images = entries.len() - videos;

    let mut lines = Vec::new();
    let detail = if videos > 0 {
        format!(
            " ({}, {})",
            plural(images, "image", "images"),
            plural(videos, "video", "videos")
        )
    } else {
        String::new()
    };
    lines.push(format!(
        "{}: {}{}",
        title,
        plural(entries.len(), "item", "items"),
        detail
    ));
    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), entry.name));
        lines.push(format!("{}Path: {}", indent(2), entry.path));
    }
    lines
}

/// Print both listings of a site.
pub fn print_listings(config: &SiteConfig, listings: &[(GalleryKind, Vec<GalleryEntry>)]) {
    for (kind, entries) in listings {
        println!();
        for line in format_listing(gallery_title(config, *kind), entries) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Gallery load output
// ============================================================================

/// Header line of a gallery load: title and where the listing came from.
pub fn format_load_started(title: &str, source: &str) -> String {
    format!("{} \u{2190} {}", title, source)
}

/// One progressive update: a slot whose probe just finished.
pub fn format_slot_resolved(index: usize, item: &DisplayItem) -> String {
    format!(
        "{}resolved {} {} {}",
        indent(1),
        format_index(index + 1),
        item.src,
        item_size(item)
    )
}

/// Format a finished gallery view.
///
/// Entries give the display names; slots past the entry list (the error
/// placeholder) fall back to their `src`.
pub fn format_gallery_view(view: &GalleryView, entries: &[GalleryEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    if let LoadStatus::Error(message) = view.status() {
        lines.push(format!("{}Error: {}", indent(1), message));
    }
    for (i, slot) in view.slots().iter().enumerate() {
        let name = entries
            .get(i)
            .map(|e| e.name.as_str())
            .or(slot.as_ref().map(|item| item.src.as_str()))
            .unwrap_or("?");
        match slot {
            Some(item) => lines.push(format!(
                "{}{} {} {}",
                indent(1),
                format_index(i + 1),
                name,
                item_size(item)
            )),
            None => lines.push(format!(
                "{}{} {} (pending)",
                indent(1),
                format_index(i + 1),
                name
            )),
        }
    }
    let summary = match view.status() {
        LoadStatus::Ready => format!("Loaded {}", plural(view.resolved_count(), "item", "items")),
        LoadStatus::Error(_) => "Listing failed, showing placeholder".to_string(),
        LoadStatus::Loading => "Still loading".to_string(),
    };
    lines.push(summary);
    lines
}

/// Print a finished gallery view.
pub fn print_gallery_view(view: &GalleryView, entries: &[GalleryEntry]) {
    for line in format_gallery_view(view, entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format what a build wrote.
pub fn format_generate_output(
    summary: &GenerateSummary,
    config: &SiteConfig,
    output_dir: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (kind, count) in &summary.galleries {
        lines.push(format!(
            "{}: {}",
            gallery_title(config, *kind),
            plural(*count, "item", "items")
        ));
    }
    lines.push(format!(
        "Copied {}",
        plural(summary.public_files, "public file", "public files")
    ));
    lines.push(format!(
        "Generated {} \u{2192} {}",
        plural(summary.files.len(), "file", "files"),
        output_dir.display()
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary, config: &SiteConfig, output_dir: &Path) {
    for line in format_generate_output(summary, config, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Serve output
// ============================================================================

pub fn format_serve_banner(addr: SocketAddr, dist: &Path, public: &Path) -> Vec<String> {
    vec![
        format!("Serving http://{}", addr),
        format!("{}Site: {}", indent(1), dist.display()),
        format!("{}Fallback: {}", indent(1), public.display()),
        format!(
            "{}API: {}, {}",
            indent(1),
            GalleryKind::Photos.api_path(),
            GalleryKind::Certificates.api_path()
        ),
    ]
}

pub fn print_serve_banner(addr: SocketAddr, dist: &Path, public: &Path) {
    for line in format_serve_banner(addr, dist, public) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
