//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Arbo Servis"
//! url = "https://arbo-servis.cz"   # Base for sitemap.xml
//! lang = "cs"
//!
//! [gallery]
//! title = "Galerie"
//! order = "shuffle"                 # "shuffle" or "newest"
//!
//! [certificates]
//! title = "Certifikáty"
//! order = "newest"
//!
//! [listing]
//! cache_max_age = 300               # Cache-Control max-age of /api/* responses
//!
//! [loader]
//! placeholder = "/placeholder-image.png"
//! default_width = 800               # Used for videos and failed probes
//! default_height = 600
//!
//! [server]
//! bind = "127.0.0.1:4321"
//!
//! [colors.light]
//! background = "#fafaf9"
//! text = "#1c1917"
//! text_muted = "#57534e"
//! border = "#e7e5e4"
//! link = "#292524"
//! link_hover = "#000000"
//! accent = "#a4161a"
//!
//! [colors.dark]
//! # same keys
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::listing::ListingOrder;
use crate::types::{Dimensions, GalleryKind};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteMeta,
    /// Photo/video gallery settings.
    pub gallery: GalleryConfig,
    /// Certificates gallery settings.
    pub certificates: GalleryConfig,
    pub listing: ListingConfig,
    pub loader: LoaderConfig,
    pub server: ServerConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMeta::default(),
            gallery: GalleryConfig::default(),
            certificates: GalleryConfig::default_certificates(),
            listing: ListingConfig::default(),
            loader: LoaderConfig::default(),
            server: ServerConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loader.default_width == 0 || self.loader.default_height == 0 {
            return Err(ConfigError::Validation(
                "loader.default_width and loader.default_height must be non-zero".into(),
            ));
        }
        if !self.loader.placeholder.starts_with('/') {
            return Err(ConfigError::Validation(
                "loader.placeholder must be a site-absolute path".into(),
            ));
        }
        let site_url_ok = Url::parse(&self.site.url).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
        });
        if !site_url_ok {
            return Err(ConfigError::Validation(format!(
                "site.url must be an absolute http(s) URL: {}",
                self.site.url
            )));
        }
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }

    /// Gallery settings for one of the two galleries.
    pub fn gallery_for(&self, kind: GalleryKind) -> &GalleryConfig {
        match kind {
            GalleryKind::Photos => &self.gallery,
            GalleryKind::Certificates => &self.certificates,
        }
    }
}

/// Site identity used in page titles and the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    /// Absolute base URL, no trailing slash required.
    pub url: String,
    /// `lang` attribute of generated documents.
    pub lang: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Arbo Servis".to_string(),
            url: "https://arbo-servis.cz".to_string(),
            lang: "cs".to_string(),
        }
    }
}

/// Per-gallery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Heading of the gallery page.
    pub title: String,
    /// Order of listing entries.
    pub order: ListingOrder,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Galerie".to_string(),
            order: ListingOrder::Shuffle,
        }
    }
}

impl GalleryConfig {
    pub fn default_certificates() -> Self {
        Self {
            title: "Certifikáty".to_string(),
            order: ListingOrder::Newest,
        }
    }
}

/// Listing endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// `Cache-Control: public, max-age=N` on listing responses.
    pub cache_max_age: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { cache_max_age: 300 }
    }
}

impl ListingConfig {
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }
}

/// Gallery loader fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Image shown alone when the listing itself cannot be loaded.
    pub placeholder: String,
    /// Width used for videos and for images whose probe fails.
    pub default_width: u32,
    /// Height used for videos and for images whose probe fails.
    pub default_height: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            placeholder: "/placeholder-image.png".to_string(),
            default_width: 800,
            default_height: 600,
        }
    }
}

impl LoaderConfig {
    pub fn default_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.default_width,
            height: self.default_height,
        }
    }
}

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:4321".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text color (footer, captions, loading messages).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Brand color for buttons and the active nav item.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fafaf9".to_string(),
            text: "#1c1917".to_string(),
            text_muted: "#57534e".to_string(),
            border: "#e7e5e4".to_string(),
            link: "#292524".to_string(),
            link_hover: "#000000".to_string(),
            accent: "#a4161a".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0c0a09".to_string(),
            text: "#f5f5f4".to_string(),
            text_muted: "#a8a29e".to_string(),
            border: "#292524".to_string(),
            link: "#d6d3d1".to_string(),
            link_hover: "#ffffff".to_string(),
            accent: "#e5383b".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# arbo-site configuration
# =======================
# Place this file in the content directory. Every key is optional; values
# shown are the defaults. Unknown keys are rejected.

[site]
# Shown in <title> and the header.
title = "Arbo Servis"
# Absolute base URL used for sitemap.xml.
url = "https://arbo-servis.cz"
lang = "cs"

[gallery]
# Photo and video gallery (public/gallery/images + public/gallery/videos).
title = "Galerie"
# "shuffle" gives a fresh order on every request; "newest" sorts by
# modification time, newest first.
order = "shuffle"

[certificates]
# Certificate scans (public/certificates).
title = "Certifikáty"
order = "newest"

[listing]
# Cache-Control max-age (seconds) of /api/gallery-images and
# /api/certificates-images.
cache_max_age = 300

[loader]
# Shown alone when a gallery listing cannot be loaded.
placeholder = "/placeholder-image.png"
# Layout size for videos and for images whose dimensions cannot be read.
default_width = 800
default_height = 600

[server]
# Address of `arbo-site serve`.
bind = "127.0.0.1:4321"

[colors.light]
background = "#fafaf9"
text = "#1c1917"
text_muted = "#57534e"
border = "#e7e5e4"
link = "#292524"
link_hover = "#000000"
accent = "#a4161a"

[colors.dark]
background = "#0c0a09"
text = "#f5f5f4"
text_muted = "#a8a29e"
border = "#292524"
link = "#d6d3d1"
link_hover = "#ffffff"
accent = "#e5383b"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("--color-bg", &scheme.background),
            ("--color-text", &scheme.text),
            ("--color-text-muted", &scheme.text_muted),
            ("--color-border", &scheme.border),
            ("--color-link", &scheme.link),
            ("--color-link-hover", &scheme.link_hover),
            ("--color-accent", &scheme.accent),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}
