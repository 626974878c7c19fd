//! HTTP surface: the two live listing endpoints plus static files.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /api/gallery-images` | JSON array of gallery entries (with `type`) |
//! | `GET /api/certificates-images` | JSON array of certificate entries (no `type`) |
//! | anything else | file from `dist/`, then `public/`, else `dist/404.html` |
//!
//! Listing responses carry `Cache-Control: public, max-age=N`. Each request
//! rescans the directory on the blocking pool; if that task cannot be joined
//! the endpoint answers 500 with `{"error": ...}` and no cache header. A
//! directory that cannot be read is not a failure: it lists as `[]`.

use crate::config::SiteConfig;
use crate::listing::{self, ListingOrder};
use crate::types::{GalleryEntry, GalleryKind};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use axum::routing::get;
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Cannot bind {0}: {1}")]
    Bind(SocketAddr, std::io::Error),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory scan used by the listing handlers.
pub type Lister = fn(GalleryKind, &Path, ListingOrder) -> Vec<GalleryEntry>;

/// Shared, read-only state of the server. No state survives a request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    public_root: PathBuf,
    dist_dir: PathBuf,
    gallery_order: ListingOrder,
    certificates_order: ListingOrder,
    cache_control: String,
    lister: Lister,
}

impl AppState {
    pub fn new(public_root: impl Into<PathBuf>, dist_dir: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                public_root: public_root.into(),
                dist_dir: dist_dir.into(),
                gallery_order: config.gallery.order,
                certificates_order: config.certificates.order,
                cache_control: config.listing.cache_control(),
                lister: listing::listing_for,
            }),
        }
    }

    /// Replace the directory scan (tests inject failing scans).
    pub fn with_lister(self, lister: Lister) -> Self {
        let inner = Arc::try_unwrap(self.inner).unwrap_or_else(|shared| Inner {
            public_root: shared.public_root.clone(),
            dist_dir: shared.dist_dir.clone(),
            gallery_order: shared.gallery_order,
            certificates_order: shared.certificates_order,
            cache_control: shared.cache_control.clone(),
            lister: shared.lister,
        });
        Self {
            inner: Arc::new(Inner { lister, ..inner }),
        }
    }

    fn order(&self, kind: GalleryKind) -> ListingOrder {
        match kind {
            GalleryKind::Photos => self.inner.gallery_order,
            GalleryKind::Certificates => self.inner.certificates_order,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let dist = &state.inner.dist_dir;
    let static_files = ServeDir::new(dist).fallback(
        ServeDir::new(&state.inner.public_root)
            .not_found_service(ServeFile::new(dist.join("404.html"))),
    );

    Router::new()
        .route(GalleryKind::Photos.api_path(), get(gallery_images))
        .route(GalleryKind::Certificates.api_path(), get(certificates_images))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn gallery_images(State(state): State<AppState>) -> Response {
    listing_response(state, GalleryKind::Photos).await
}

async fn certificates_images(State(state): State<AppState>) -> Response {
    listing_response(state, GalleryKind::Certificates).await
}

async fn listing_response(state: AppState, kind: GalleryKind) -> Response {
    let root = state.inner.public_root.clone();
    let order = state.order(kind);
    let lister = state.inner.lister;
    let result =
        tokio::task::spawn_blocking(move || listing::listing_body(kind, lister(kind, &root, order)))
            .await;

    let failure = match result {
        Ok(Ok(body)) => {
            return (
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CACHE_CONTROL, state.inner.cache_control.clone()),
                ],
                body,
            )
                .into_response();
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };

    error!(endpoint = kind.api_path(), error = %failure, "listing failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": kind.failure_message() })),
    )
        .into_response()
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServeError::Bind(addr, e))?;
    info!(%addr, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
