//! HTML site generation.
//!
//! Stage 3 of the build. Takes the scan manifest plus the loaded galleries and
//! writes the final static site.
//!
//! ## Generated Files
//!
//! - **Content pages** (`/index.html`, `/{slug}.html`): markdown rendered to HTML
//! - **Gallery pages**: masonry grid (photos) or framed grid (certificates),
//!   followed by the lightbox
//! - **404 page** (`/404.html`): always written
//! - **Sitemap** (`/sitemap.xml`): every page except links and the 404
//! - **Listing snapshots** (`/api/gallery-images`, `/api/certificates-images`):
//!   the listing JSON as of build time, for static hosting
//! - Everything under `public/`, copied verbatim
//!
//! ## Lightbox
//!
//! No script is needed to browse a gallery. Each tile links to `#slide-N`; the
//! matching slide becomes visible through `:target`. Prev/next links wrap
//! around and the close link targets `#`. The slide array is also embedded as
//! `<script type="application/json" id="slides">` for enhanced viewers.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/nav.js`: Mobile menu behaviour (Escape, outside click, scroll lock)

use crate::config::{self, SiteConfig};
use crate::gallery::{GalleryView, LoadStatus};
use crate::listing;
use crate::scan::SiteManifest;
use crate::types::{DisplayItem, GalleryEntry, GalleryKind, MediaKind, NavItem, Page, PageKind, Slide};
use chrono::{DateTime, Datelike, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot copy public directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A gallery after loading: the listing it came from and the final view.
#[derive(Debug, Clone)]
pub struct LoadedGallery {
    pub entries: Vec<GalleryEntry>,
    pub view: GalleryView,
}

/// What a build wrote.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    /// Files written, relative to the output directory, in write order.
    pub files: Vec<String>,
    /// Files copied from the public directory.
    pub public_files: usize,
    /// Item count per gallery page.
    pub galleries: Vec<(GalleryKind, usize)>,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

pub fn generate(
    manifest: &SiteManifest,
    galleries: &HashMap<GalleryKind, LoadedGallery>,
    public_dir: &Path,
    output_dir: &Path,
    built_at: DateTime<Utc>,
) -> Result<GenerateSummary, GenerateError> {
    let mut summary = GenerateSummary::default();

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&manifest.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    let ctx = PageContext {
        config: &manifest.config,
        navigation: &manifest.navigation,
        css: &css,
        year: built_at.year(),
    };

    fs::create_dir_all(output_dir)?;
    summary.public_files = copy_public(public_dir, output_dir)?;

    let empty = GalleryView::new();
    for page in manifest.pages.iter().filter(|p| p.kind != PageKind::Link) {
        let markup = match page.kind {
            PageKind::Gallery(kind) => {
                let view = galleries.get(&kind).map(|g| &g.view).unwrap_or(&empty);
                summary.galleries.push((kind, view.items().count()));
                render_gallery_page(page, kind, view, &ctx)
            }
            _ => render_content_page(page, &ctx),
        };
        write_file(output_dir, &page.output_file(), markup.into_string(), &mut summary)?;
    }

    write_file(output_dir, "404.html", render_not_found(&ctx).into_string(), &mut summary)?;
    write_file(
        output_dir,
        "sitemap.xml",
        render_sitemap(&manifest.pages, &manifest.config.site.url, built_at),
        &mut summary,
    )?;

    for kind in [GalleryKind::Photos, GalleryKind::Certificates] {
        let entries = galleries
            .get(&kind)
            .map(|g| g.entries.clone())
            .unwrap_or_default();
        let body = listing::listing_body(kind, entries)?;
        let rel = kind.api_path().trim_start_matches('/');
        write_file(output_dir, rel, body, &mut summary)?;
    }

    info!(
        output = %output_dir.display(),
        files = summary.files.len(),
        public = summary.public_files,
        "site generated"
    );
    Ok(summary)
}

fn write_file(
    output_dir: &Path,
    rel: &str,
    contents: String,
    summary: &mut GenerateSummary,
) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    debug!(file = rel, "wrote");
    summary.files.push(rel.to_string());
    Ok(())
}

/// Copy the public directory into the output. A missing public directory
/// copies nothing.
fn copy_public(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target: PathBuf = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Shared inputs of every page renderer.
struct PageContext<'a> {
    config: &'a SiteConfig,
    navigation: &'a [NavItem],
    css: &'a str,
    year: i32,
}

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    ctx: &PageContext,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.config.site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(ctx.css)) }
            }
            body class=[body_class] {
                (content)
                footer.site-footer {
                    "© " (ctx.year) " " (ctx.config.site.title)
                }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header: brand link plus navigation.
fn site_header(site_title: &str, nav: Markup) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (site_title) }
            (nav)
        }
    }
}

/// Renders the desktop link bar and the mobile hamburger menu.
///
/// The hamburger is a checkbox toggle so the menu works without script;
/// `nav.js` adds Escape/outside-click closing and the body scroll lock.
pub fn render_nav(items: &[NavItem], current_slug: &str) -> Markup {
    html! {
        nav.site-nav aria-label="Hlavní navigace" {
            ul {
                @for item in items {
                    (render_nav_item(item, current_slug))
                }
            }
        }
        input.nav-toggle type="checkbox" id="nav-toggle" aria-controls="mobile-nav";
        label.nav-hamburger for="nav-toggle" aria-controls="mobile-nav" aria-expanded="false" {
            span.sr-only { "Menu" }
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        nav.mobile-nav id="mobile-nav" {
            ul {
                @for item in items {
                    (render_nav_item(item, current_slug))
                }
            }
        }
    }
}

fn render_nav_item(item: &NavItem, current_slug: &str) -> Markup {
    let is_current = !item.external && item.slug == current_slug;
    html! {
        li class=[is_current.then_some("current")] {
            @if item.external {
                a href=(item.href) target="_blank" rel="noopener" { (item.title) }
            } @else {
                a href=(item.href) aria-current=[is_current.then_some("page")] { (item.title) }
            }
        }
    }
}

fn page_title(page_title: &str, site_title: &str) -> String {
    if page_title == site_title {
        site_title.to_string()
    } else {
        format!("{page_title} | {site_title}")
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a markdown content page
fn render_content_page(page: &Page, ctx: &PageContext) -> Markup {
    let parser = Parser::new(&page.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let content = html! {
        (site_header(&ctx.config.site.title, render_nav(ctx.navigation, &page.slug)))
        main.content-page {
            article.page-content {
                (PreEscaped(body_html))
            }
        }
    };

    base_document(&page_title(&page.title, &ctx.config.site.title), ctx, None, content)
}

fn render_gallery_page(page: &Page, kind: GalleryKind, view: &GalleryView, ctx: &PageContext) -> Markup {
    let content = html! {
        (site_header(&ctx.config.site.title, render_nav(ctx.navigation, &page.slug)))
        main.gallery-page {
            h1 { (page.title) }
            (render_gallery(kind, view))
        }
    };
    base_document(
        &page_title(&page.title, &ctx.config.site.title),
        ctx,
        Some("gallery-view"),
        content,
    )
}

fn render_not_found(ctx: &PageContext) -> Markup {
    let content = html! {
        (site_header(&ctx.config.site.title, render_nav(ctx.navigation, "")))
        main.not-found {
            h1 { "404" }
            p { "Stránka nebyla nalezena." }
            a.button href="/" { "Zpět na úvod" }
        }
    };
    base_document(&page_title("Stránka nenalezena", &ctx.config.site.title), ctx, None, content)
}

// ============================================================================
// Gallery and lightbox
// ============================================================================

/// User-facing strings of one gallery.
struct GalleryLabels {
    loading: &'static str,
    error: &'static str,
    empty: &'static str,
    item_alt: &'static str,
}

fn labels(kind: GalleryKind) -> GalleryLabels {
    match kind {
        GalleryKind::Photos => GalleryLabels {
            loading: "Načítám galerii...",
            error: "Chyba při načítání galerie",
            empty: "Galerie je zatím prázdná.",
            item_alt: "Fotografie",
        },
        GalleryKind::Certificates => GalleryLabels {
            loading: "Načítám certifikáty...",
            error: "Chyba při načítání certifikátů",
            empty: "Zatím zde nejsou žádné certifikáty.",
            item_alt: "Certifikát",
        },
    }
}

/// Renders a gallery view: status panel, tile grid, and lightbox.
///
/// Slots are rendered index-aligned; an unresolved slot becomes an empty
/// pending tile so slide numbers always match listing positions.
pub fn render_gallery(kind: GalleryKind, view: &GalleryView) -> Markup {
    let text = labels(kind);
    let slots = view.slots();
    html! {
        @match view.status() {
            LoadStatus::Loading => {
                div.gallery-status.loading {
                    div.spinner {}
                    p { (text.loading) }
                }
            }
            LoadStatus::Error(message) => {
                div.gallery-status.error role="alert" {
                    p.error-title { (text.error) }
                    p.error-message { (message) }
                    a.button.retry href="" { "Zkusit znovu" }
                }
            }
            LoadStatus::Ready => {}
        }
        @if *view.status() == LoadStatus::Ready && slots.is_empty() {
            p.gallery-empty { (text.empty) }
        }
        @if !slots.is_empty() {
            @match kind {
                GalleryKind::Photos => {
                    div.masonry-grid {
                        @for (idx, slot) in slots.iter().enumerate() {
                            (photo_tile(idx, slot.as_ref(), text.item_alt))
                        }
                    }
                }
                GalleryKind::Certificates => {
                    div.certificates-grid {
                        @for (idx, slot) in slots.iter().enumerate() {
                            (certificate_tile(idx, slot.as_ref(), text.item_alt))
                        }
                    }
                }
            }
            (render_lightbox(slots))
        }
    }
}

fn slide_href(idx: usize) -> String {
    format!("#slide-{idx}")
}

fn photo_tile(idx: usize, item: Option<&DisplayItem>, alt: &str) -> Markup {
    html! {
        @match item {
            Some(item) if item.kind == MediaKind::Video => {
                a.masonry-item href=(slide_href(idx)) {
                    div.video-wrapper {
                        video.gallery-video src=(item.src) width=(item.width) height=(item.height)
                            preload="metadata" muted loop playsinline {}
                        div.video-play-overlay {
                            svg.play-icon viewBox="0 0 24 24" fill="currentColor" {
                                path d="M8 5v14l11-7z" {}
                            }
                        }
                    }
                }
            }
            Some(item) => {
                a.masonry-item href=(slide_href(idx)) {
                    img.gallery-image src=(item.src) width=(item.width) height=(item.height)
                        alt={ (alt) " " (idx + 1) } loading="lazy";
                }
            }
            None => {
                div.masonry-item.pending {}
            }
        }
    }
}

fn certificate_tile(idx: usize, item: Option<&DisplayItem>, alt: &str) -> Markup {
    html! {
        @if let Some(item) = item {
            a.certificate-item href=(slide_href(idx)) {
                div.certificate-frame {
                    img.certificate-image src=(item.src) width=(item.width) height=(item.height)
                        alt={ (alt) " " (idx + 1) } loading="lazy";
                    div.certificate-overlay {
                        span.certificate-label { "Zobrazit certifikát" }
                    }
                }
            }
        } @else {
            div.certificate-item.pending {}
        }
    }
}

/// One `:target` slide per slot with wrapping prev/next links.
///
/// The embedded JSON has one element per slot; pending slots are `null`.
fn render_lightbox(slots: &[Option<DisplayItem>]) -> Markup {
    let len = slots.len();
    let slides: Vec<Option<Slide>> = slots
        .iter()
        .map(|slot| slot.as_ref().map(DisplayItem::slide))
        .collect();
    // `</` would end the script element early
    let slides_json = serde_json::to_string(&slides)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    html! {
        div.lightbox {
            @for (idx, slot) in slots.iter().enumerate() {
                div.lightbox-slide id={ "slide-" (idx) } {
                    a.lightbox-backdrop href="#" aria-label="Zavřít" {}
                    a.lightbox-close href="#" aria-label="Zavřít" { "×" }
                    @if len > 1 {
                        a.lightbox-prev href=(slide_href((idx + len - 1) % len)) aria-label="Předchozí" { "‹" }
                        a.lightbox-next href=(slide_href((idx + 1) % len)) aria-label="Další" { "›" }
                    }
                    figure.lightbox-figure {
                        @match slot.as_ref().map(DisplayItem::slide) {
                            Some(Slide::Image { src, width, height }) => {
                                img src=(src) width=(width) height=(height) alt="" loading="lazy";
                            }
                            Some(Slide::Video { width, height, sources }) => {
                                video controls preload="none" width=(width) height=(height) {
                                    @for source in &sources {
                                        source src=(source.src) type=(source.mime);
                                    }
                                }
                            }
                            None => {
                                div.spinner {}
                            }
                        }
                    }
                    span.lightbox-counter { (idx + 1) " / " (len) }
                }
            }
        }
        script type="application/json" id="slides" { (PreEscaped(slides_json)) }
    }
}

// ============================================================================
// Sitemap
// ============================================================================

/// Renders `sitemap.xml` for every generated page except external links.
pub fn render_sitemap(pages: &[Page], base_url: &str, built_at: DateTime<Utc>) -> String {
    let base = base_url.trim_end_matches('/');
    let lastmod = built_at.format("%Y-%m-%d").to_string();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in pages.iter().filter(|p| p.kind != PageKind::Link) {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.7</priority>\n  </url>\n",
            xml_escape(base),
            xml_escape(&page.href()),
            lastmod
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================
