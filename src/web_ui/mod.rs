//! Web UI Module
//!
//! The gallery page and the script that drives it. The page embeds the
//! catalog as a single JSON value; all navigation happens client side.

mod assets;
mod routes;
mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router.
/// Mount this with `.merge(web_ui::router())` in main.rs
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
