use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use moka::future::Cache;

use crate::catalog::{find_latest_image, load_catalog, Catalog};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};

/// Application state shared across handlers
pub struct AppState {
    pub config: GalleryConfig,
    /// Rendered gallery page, absent when caching is disabled
    pub page_cache: Option<Cache<&'static str, String>>,
}

impl AppState {
    pub fn new(config: GalleryConfig) -> Self {
        let page_cache = if config.cache_ttl.is_zero() {
            None
        } else {
            Some(
                Cache::builder()
                    .max_capacity(1)
                    .time_to_live(config.cache_ttl)
                    .build(),
            )
        };

        Self { config, page_cache }
    }
}

/// Run filesystem work off the async workers.
pub async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| GalleryError::Internal(format!("Blocking task failed: {}", e)))?
}

/// Scan the root directory and group its images.
pub async fn current_catalog(state: &Arc<AppState>) -> Result<Catalog> {
    let state = state.clone();
    blocking(move || load_catalog(&state.config)).await
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// GET /catalog.json - the current catalog, uncached
pub async fn catalog_json(State(state): State<Arc<AppState>>) -> Result<Json<Catalog>> {
    Ok(Json(current_catalog(&state).await?))
}

/// GET /latest - the most recently created image
pub async fn latest_image(State(state): State<Arc<AppState>>) -> Result<Response> {
    let scan_state = state.clone();
    let name = blocking(move || {
        find_latest_image(&scan_state.config.root, &scan_state.config.extensions)
    })
    .await?;

    tracing::debug!("Latest image is {}", name);
    serve_file(&state.config.root, &name).await
}

/// GET /images/:filename - a file from the root directory
pub async fn image_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response> {
    serve_file(&state.config.root, &filename).await
}

/// Reject anything that is not a plain file name inside the root.
fn check_file_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));

    if invalid {
        return Err(GalleryError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

async fn serve_file(root: &FsPath, name: &str) -> Result<Response> {
    check_file_name(name)?;
    let path = root.join(name);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GalleryError::ImageNotFound(name.to_string()));
        }
        Err(e) => return Err(GalleryError::Io(e)),
    };
    if !metadata.is_file() {
        return Err(GalleryError::ImageNotFound(name.to_string()));
    }

    let content = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, guess_content_type(name))], content).into_response())
}

/// Guess content type from file extension
fn guess_content_type(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
