//! Asset listings: which gallery files exist on disk.
//!
//! Both galleries are backed by fixed directories under the public root:
//!
//! ```text
//! public/
//! ├── gallery/
//! │   ├── images/      # jpg jpeg png gif webp  → /gallery/images/<name>
//! │   └── videos/      # mp4 webm ogg mov avi   → /gallery/videos/<name>
//! └── certificates/    # jpg jpeg png gif webp  → /certificates/<name>
//! ```
//!
//! A listing is a directory scan filtered by the extension allow-list, with
//! one `stat` per kept file for size and modification time. A directory that
//! cannot be read contributes nothing: the listing degrades to fewer (or
//! zero) entries instead of failing.

use crate::types::{CertificateEntry, GalleryEntry, GalleryKind, MediaKind};
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Directory of gallery images, relative to the public root.
pub const GALLERY_IMAGES_DIR: &str = "gallery/images";
/// Directory of gallery videos, relative to the public root.
pub const GALLERY_VIDEOS_DIR: &str = "gallery/videos";
/// Directory of certificate scans, relative to the public root.
pub const CERTIFICATES_DIR: &str = "certificates";

/// Characters escaped when a file name becomes a URL path segment.
pub const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Order applied to a listing after scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrder {
    /// Most recently modified first; ties by name.
    Newest,
    /// Unseeded random permutation, different on every call.
    Shuffle,
}

/// Scan one directory for files of `kind`.
///
/// Entries get `path = "<url_prefix>/<file name>"`, with the file name
/// percent-encoded; `name` stays as on disk. Returned in directory
/// order; callers apply a [`ListingOrder`].
pub fn scan_dir(dir: &Path, url_prefix: &str, kind: MediaKind) -> Vec<GalleryEntry> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read asset directory, listing it as empty");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for dir_entry in read.filter_map(|e| e.ok()) {
        let path = dir_entry.path();
        if !kind.accepts(&path) {
            continue;
        }
        let Ok(name) = dir_entry.file_name().into_string() else {
            debug!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };
        // fs::metadata follows symlinks, so linked assets are listed too
        let metadata = match fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot stat asset, skipping");
                continue;
            }
        };
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();
        entries.push(GalleryEntry {
            path: format!(
                "{}/{}",
                url_prefix.trim_end_matches('/'),
                utf8_percent_encode(&name, PATH_SEGMENT)
            ),
            name,
            size: metadata.len(),
            modified,
            kind,
        });
    }
    entries
}

/// Photo gallery listing: images and videos merged, then ordered.
pub fn gallery_listing(public_root: &Path, order: ListingOrder) -> Vec<GalleryEntry> {
    let mut entries = scan_dir(
        &public_root.join(GALLERY_IMAGES_DIR),
        "/gallery/images",
        MediaKind::Image,
    );
    entries.extend(scan_dir(
        &public_root.join(GALLERY_VIDEOS_DIR),
        "/gallery/videos",
        MediaKind::Video,
    ));
    apply_order(&mut entries, order);
    entries
}

/// Certificates listing: images only.
pub fn certificates_listing(public_root: &Path, order: ListingOrder) -> Vec<GalleryEntry> {
    let mut entries = scan_dir(
        &public_root.join(CERTIFICATES_DIR),
        "/certificates",
        MediaKind::Image,
    );
    apply_order(&mut entries, order);
    entries
}

/// Listing for either gallery.
pub fn listing_for(kind: GalleryKind, public_root: &Path, order: ListingOrder) -> Vec<GalleryEntry> {
    match kind {
        GalleryKind::Photos => gallery_listing(public_root, order),
        GalleryKind::Certificates => certificates_listing(public_root, order),
    }
}

/// Wire body of a listing: gallery entries carry `type`, certificate
/// entries do not.
pub fn listing_body(kind: GalleryKind, entries: Vec<GalleryEntry>) -> serde_json::Result<String> {
    match kind {
        GalleryKind::Photos => serde_json::to_string(&entries),
        GalleryKind::Certificates => serde_json::to_string(
            &entries
                .into_iter()
                .map(CertificateEntry::from)
                .collect::<Vec<_>>(),
        ),
    }
}

pub fn apply_order(entries: &mut [GalleryEntry], order: ListingOrder) {
    match order {
        ListingOrder::Newest => entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.name.cmp(&b.name))
        }),
        ListingOrder::Shuffle => entries.shuffle(&mut rand::thread_rng()),
    }
}
