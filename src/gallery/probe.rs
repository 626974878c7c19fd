//! Dimension probes: read an asset's intrinsic pixel size.
//!
//! A probe only needs the image header, so both implementations stop after
//! format detection and header decoding:
//!
//! | Probe | Reads from | Decoder |
//! |---|---|---|
//! | [`FsProbe`] | public root on disk | `image::image_dimensions` on the blocking pool |
//! | [`HttpProbe`] | running site over HTTP | `ImageReader::with_guessed_format` on fetched bytes |

use crate::types::Dimensions;
use async_trait::async_trait;
use image::ImageReader;
use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read image header: {0}")]
    Decode(#[from] image::ImageError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("Invalid asset URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("Asset path escapes the public root: {0}")]
    OutsideRoot(String),
    #[error("Probe task failed: {0}")]
    Task(String),
}

/// Asynchronous dimension probe for one asset, addressed by its site path.
#[async_trait]
pub trait DimensionProbe: Send + Sync {
    async fn probe(&self, src: &str) -> Result<Dimensions, ProbeError>;
}

/// Reads dimensions from files under the public root.
#[derive(Debug, Clone)]
pub struct FsProbe {
    public_root: PathBuf,
}

impl FsProbe {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    /// Map a site path (`/gallery/images/a.jpg`) to a file under the root.
    ///
    /// The path is percent-decoded first. Only plain path segments are
    /// accepted; `..` and absolute components inside the path are rejected.
    pub fn resolve(&self, src: &str) -> Result<PathBuf, ProbeError> {
        let decoded = percent_decode_str(src)
            .decode_utf8()
            .map_err(|e| ProbeError::InvalidUrl(src.to_string(), e.to_string()))?;
        let relative = decoded.trim_start_matches('/');
        let mut path = self.public_root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => path.push(segment),
                Component::CurDir => {}
                _ => return Err(ProbeError::OutsideRoot(src.to_string())),
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl DimensionProbe for FsProbe {
    async fn probe(&self, src: &str) -> Result<Dimensions, ProbeError> {
        let path = self.resolve(src)?;
        let (width, height) = tokio::task::spawn_blocking(move || image::image_dimensions(&path))
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))??;
        Ok(Dimensions { width, height })
    }
}

/// Fetches assets from a running site and reads dimensions from the bytes.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    base: Url,
}

impl HttpProbe {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl DimensionProbe for HttpProbe {
    async fn probe(&self, src: &str) -> Result<Dimensions, ProbeError> {
        let url = self
            .base
            .join(src)
            .map_err(|e| ProbeError::InvalidUrl(src.to_string(), e.to_string()))?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProbeError::Status(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        decode_dimensions(&bytes)
    }
}

/// Read dimensions from in-memory image bytes, guessing the format from the
/// magic number.
pub fn decode_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions { width, height })
}
