//! Listing sources: where the gallery loader gets its entries.

use crate::listing::{self, ListingOrder};
use crate::types::{GalleryEntry, GalleryKind};
use async_trait::async_trait;
use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the listing fetch. Any of these puts the view into the error
/// state; there is no distinction between transient and permanent causes.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to fetch images: {0}")]
    Status(u16),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid listing response: {0}")]
    Parse(String),
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(String),
    #[error("Listing task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<GalleryEntry>, LoadError>;
}

/// Scans the public root directly, the same way the listing endpoint does.
#[derive(Debug, Clone)]
pub struct LocalListing {
    public_root: PathBuf,
    kind: GalleryKind,
    order: ListingOrder,
}

impl LocalListing {
    pub fn new(public_root: impl Into<PathBuf>, kind: GalleryKind, order: ListingOrder) -> Self {
        Self {
            public_root: public_root.into(),
            kind,
            order,
        }
    }
}

#[async_trait]
impl ListingSource for LocalListing {
    async fn fetch(&self) -> Result<Vec<GalleryEntry>, LoadError> {
        let root = self.public_root.clone();
        let (kind, order) = (self.kind, self.order);
        tokio::task::spawn_blocking(move || listing::listing_for(kind, &root, order))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))
    }
}

/// Fetches the listing from a running site's endpoint.
#[derive(Debug, Clone)]
pub struct HttpListing {
    client: reqwest::Client,
    url: Url,
}

impl HttpListing {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Listing of `kind` on the site at `base`.
    pub fn for_gallery(
        client: reqwest::Client,
        base: &Url,
        kind: GalleryKind,
    ) -> Result<Self, LoadError> {
        let url = base
            .join(kind.api_path())
            .map_err(|e| LoadError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(client, url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ListingSource for HttpListing {
    async fn fetch(&self) -> Result<Vec<GalleryEntry>, LoadError> {
        let response = self.client.get(self.url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        parse_listing(&body)
    }
}

/// Parse a listing response body. Anything other than a JSON array of
/// entries is a parse failure.
pub fn parse_listing(body: &str) -> Result<Vec<GalleryEntry>, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;
    use tempfile::TempDir;

    #[test]
    fn parse_listing_accepts_both_wire_shapes() {
        let body = r#"[
            {"name":"a.jpg","path":"/gallery/images/a.jpg","size":1,"modified":"2024-01-01T00:00:00Z","type":"image"},
            {"name":"v.mp4","path":"/gallery/videos/v.mp4","size":2,"modified":"2024-01-02T00:00:00Z","type":"video"},
            {"name":"c.png","path":"/certificates/c.png","size":3,"modified":"2024-01-03T00:00:00Z"}
        ]"#;
        let entries = parse_listing(body).unwrap();
        let kinds: Vec<MediaKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![MediaKind::Image, MediaKind::Video, MediaKind::Image]
        );
    }

    #[test]
    fn parse_listing_rejects_error_object() {
        let body = r#"{"error":"Failed to load gallery items"}"#;
        assert!(matches!(parse_listing(body), Err(LoadError::Parse(_))));
    }

    #[test]
    fn parse_listing_rejects_unknown_type() {
        let body = r#"[{"name":"a","path":"/a","size":1,"modified":"2024-01-01T00:00:00Z","type":"audio"}]"#;
        assert!(matches!(parse_listing(body), Err(LoadError::Parse(_))));
    }

    #[test]
    fn http_listing_url_for_gallery() {
        let base = Url::parse("http://127.0.0.1:4321/").unwrap();
        let source =
            HttpListing::for_gallery(reqwest::Client::new(), &base, GalleryKind::Certificates)
                .unwrap();
        assert_eq!(
            source.url().as_str(),
            "http://127.0.0.1:4321/api/certificates-images"
        );
    }

    #[test]
    fn status_error_message_names_code() {
        assert_eq!(
            LoadError::Status(500).to_string(),
            "Failed to fetch images: 500"
        );
    }

    #[tokio::test]
    async fn local_listing_reads_public_root() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("certificates");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("iso.png"), b"x").unwrap();

        let source = LocalListing::new(tmp.path(), GalleryKind::Certificates, ListingOrder::Newest);
        let entries = source.fetch().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/certificates/iso.png");
    }
}
