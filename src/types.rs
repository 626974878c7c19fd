//! Shared types used across the listing, gallery, and generate stages.
//!
//! Listing types are the wire format of the `/api/*-images` endpoints and
//! must stay compatible with what the gallery loader parses back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions accepted as gallery images (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Extensions accepted as gallery videos (matched case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi"];

/// Whether a listed asset is a still image or a video.
///
/// Serialized as the `type` field. Certificate listings omit the field, so
/// deserialization defaults to [`MediaKind::Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
        }
    }

    /// True when the file extension is on this kind's allow-list.
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}

/// Which of the two site galleries a page or endpoint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryKind {
    /// Photos and videos from `gallery/images` and `gallery/videos`.
    Photos,
    /// Certificate scans from `certificates`.
    Certificates,
}

impl GalleryKind {
    /// URL of the listing endpoint serving this gallery.
    pub fn api_path(self) -> &'static str {
        match self {
            GalleryKind::Photos => "/api/gallery-images",
            GalleryKind::Certificates => "/api/certificates-images",
        }
    }

    /// Error body message returned by the endpoint on catastrophic failure.
    pub fn failure_message(self) -> &'static str {
        match self {
            GalleryKind::Photos => "Failed to load gallery items",
            GalleryKind::Certificates => "Failed to load certificates items",
        }
    }
}

/// One file found by a listing scan.
///
/// Produced from filesystem metadata; immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    /// File name, e.g. `a.jpg`.
    pub name: String,
    /// Site-absolute URL path, e.g. `/gallery/images/a.jpg`.
    pub path: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Last modification time.
    #[serde(default)]
    pub modified: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
}

/// Certificate listing item: a [`GalleryEntry`] without the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl From<GalleryEntry> for CertificateEntry {
    fn from(entry: GalleryEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            size: entry.size,
            modified: entry.modified,
        }
    }
}

/// Intrinsic pixel size of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A gallery entry as the viewer draws it: source plus layout size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub kind: MediaKind,
}

impl DisplayItem {
    pub fn new(src: impl Into<String>, dims: Dimensions, kind: MediaKind) -> Self {
        Self {
            src: src.into(),
            width: dims.width,
            height: dims.height,
            kind,
        }
    }

    /// Lightbox slide for this item.
    pub fn slide(&self) -> Slide {
        match self.kind {
            MediaKind::Image => Slide::Image {
                src: self.src.clone(),
                width: self.width,
                height: self.height,
            },
            MediaKind::Video => Slide::Video {
                width: self.width,
                height: self.height,
                sources: vec![VideoSource {
                    src: self.src.clone(),
                    mime: video_mime(&self.src).to_string(),
                }],
            },
        }
    }
}

/// Lightbox slide. Images carry a single `src`; videos carry `sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Slide {
    Image {
        src: String,
        width: u32,
        height: u32,
    },
    Video {
        width: u32,
        height: u32,
        sources: Vec<VideoSource>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub src: String,
    #[serde(rename = "type")]
    pub mime: String,
}

/// MIME type for a video URL, by extension. Unknown extensions fall back to mp4.
pub fn video_mime(src: &str) -> &'static str {
    let ext = Path::new(src)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => "video/mp4",
    }
}

/// What a content page renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Markdown body rendered to HTML.
    Content,
    /// Body is a single URL; the page is an external nav link.
    Link,
    /// Body is a gallery directive (`@gallery`, `@certificates`).
    Gallery(GalleryKind),
}

/// A page generated from a markdown file in the content root.
///
/// Numbered files (`NNN-name.md`) appear in navigation, sorted by number.
/// Unnumbered files are generated but hidden from navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from first `# heading` in markdown, or link_title as fallback
    pub title: String,
    /// Display label in nav
    pub link_title: String,
    /// URL slug (filename stem with number prefix stripped)
    pub slug: String,
    /// Raw markdown content (or URL for link pages)
    pub body: String,
    pub in_nav: bool,
    /// Sort key from number prefix
    pub sort_key: u32,
    pub kind: PageKind,
    /// Source file name within the content root
    pub source: String,
}

impl Page {
    /// Output file name relative to the site root.
    pub fn output_file(&self) -> String {
        if self.slug == "index" {
            "index.html".to_string()
        } else {
            format!("{}.html", self.slug)
        }
    }

    /// Link target used in navigation and the sitemap.
    pub fn href(&self) -> String {
        match self.kind {
            PageKind::Link => self.body.trim().to_string(),
            _ if self.slug == "index" => "/".to_string(),
            _ => format!("/{}", self.output_file()),
        }
    }
}

/// Navigation item (numbered pages only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    /// Slug of the page this item points at; empty for external links.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default)]
    pub external: bool,
}
