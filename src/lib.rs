//! # Arbo Site
//!
//! Website of a tree-care business: a handful of markdown pages, a responsive
//! navigation bar, and two media galleries (work photos and videos, and
//! professional certificates). The filesystem is the data source: numbered
//! markdown files become navigation entries, and media dropped into
//! `public/gallery/` or `public/certificates/` show up in the galleries.
//!
//! # Architecture
//!
//! ```text
//! 1. Scan      content/  →  SiteManifest        (pages, navigation, config)
//! 2. List      public/   →  Vec<GalleryEntry>   (media files, ordered)
//! 3. Load      listing   →  GalleryView         (dimensions probed concurrently)
//! 4. Generate  manifest  →  dist/               (HTML, 404, sitemap, API snapshots)
//! 5. Serve     dist/ + public/ + live listing endpoints
//! ```
//!
//! Stages 1, 2 and 4 are synchronous and pure apart from filesystem access.
//! Stage 3 is async: the loader fetches a listing through a
//! [`gallery::ListingSource`] and probes image dimensions through a
//! [`gallery::DimensionProbe`], so the same state machine runs against local
//! files at build time and against a running site from `check-gallery --url`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Reads `content/`, classifies pages, builds navigation |
//! | [`listing`] | Scans media directories into ordered gallery entries |
//! | [`gallery`] | Listing sources, dimension probes, and the progressive loader |
//! | [`generate`] | Renders the site with Maud and writes `dist/` |
//! | [`server`] | Axum router: listing endpoints plus static files |
//! | [`config`] | `config.toml` loading, validation, stock defaults, color CSS |
//! | [`types`] | Shared types: pages, navigation items, gallery entries |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed-Length Gallery Slots
//!
//! A gallery view allocates one slot per listing entry before any probe
//! finishes. Probes fill slots as they complete, in any order, but the
//! rendered order always matches the listing. A failed probe never removes an
//! item; it falls back to the configured default dimensions.
//!
//! ## No-JS Lightbox
//!
//! The lightbox is pure CSS (`:target` on `#slide-N`). The small script shipped
//! with every page only adds keyboard shortcuts and closes the mobile menu.
//!
//! ## NNN-Prefix Ordering
//!
//! Pages use a numeric prefix (`010-`, `020-`) for explicit ordering. Files
//! without a prefix are rendered but hidden from navigation.

pub mod config;
pub mod gallery;
pub mod generate;
pub mod listing;
pub mod naming;
pub mod output;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
