pub mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::config::IMAGES_URL;

pub use handlers::{catalog_json, health, image_file, latest_image, AppState};

/// Data and file routes. The gallery page itself lives in `web_ui`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/catalog.json", get(catalog_json))
        .route("/latest", get(latest_image))
        .route(&format!("{}:filename", IMAGES_URL), get(image_file))
}
