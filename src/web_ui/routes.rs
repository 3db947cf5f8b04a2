//! Web UI route handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tera::Context;

use super::assets::{GALLERY_SCRIPT, SCRIPT_PATH};
use super::templates;
use crate::api::{handlers::current_catalog, AppState};
use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};

const INDEX_CACHE_KEY: &str = "index";

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route(SCRIPT_PATH, get(gallery_script))
}

/// Gallery page, served from the page cache while it is fresh.
async fn index(State(state): State<Arc<AppState>>) -> Response {
    if let Some(cache) = &state.page_cache {
        if let Some(html) = cache.get(&INDEX_CACHE_KEY).await {
            return Html(html).into_response();
        }
    }

    let html = match current_catalog(&state)
        .await
        .and_then(|catalog| render_index(&state.config, &catalog))
    {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Failed to build gallery page: {}", e);
            return render_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not read the gallery");
        }
    };

    if let Some(cache) = &state.page_cache {
        cache.insert(INDEX_CACHE_KEY, html.clone()).await;
    }
    Html(html).into_response()
}

async fn gallery_script() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        GALLERY_SCRIPT,
    )
        .into_response()
}

/// Render the gallery page for `catalog`.
pub fn render_index(config: &GalleryConfig, catalog: &Catalog) -> Result<String> {
    // A file matching several prefixes is listed in each of their groups.
    let image_count = catalog.values().flatten().collect::<BTreeSet<_>>().len();

    let mut context = Context::new();
    context.insert("directory", &config.root_name());
    context.insert("images_url", &config.images_url);
    context.insert("script_url", SCRIPT_PATH);
    context.insert("image_count", &image_count);
    context.insert("catalog_json", &embeddable_json(catalog)?);

    Ok(templates::render("index.html", &context)?)
}

/// Serialize for a `<script>` element. Markup characters only occur inside
/// JSON strings, where the `\u` escapes decode back to the same text.
fn embeddable_json(catalog: &Catalog) -> Result<String> {
    let json = serde_json::to_string(catalog)
        .map_err(|e| GalleryError::Internal(format!("Catalog serialization failed: {}", e)))?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Helper to render an error page
fn render_error(status: StatusCode, message: &str) -> Response {
    let mut context = Context::new();
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn state_with_ttl(dir: &TempDir, ttl: Duration) -> Arc<AppState> {
        let config = GalleryConfig::new(dir.path().to_path_buf(), Vec::new()).with_cache_ttl(ttl);
        Arc::new(AppState::new(config))
    }

    #[test]
    fn test_render_index_embeds_catalog() {
        let config = GalleryConfig::new(PathBuf::from("/srv/holiday"), Vec::new());
        let mut catalog = Catalog::new();
        catalog.insert("beach".to_string(), vec!["beach1.png".to_string()]);

        let html = render_index(&config, &catalog).unwrap();
        assert!(html.contains("<title>holiday</title>"));
        assert!(html.contains(r#"{"beach":["beach1.png"]}"#));
        assert!(html.contains(SCRIPT_PATH));
        assert!(html.contains("1 image(s)"));
    }

    #[test]
    fn test_render_index_escapes_names() {
        let config = GalleryConfig::new(PathBuf::from("/srv/<b>"), Vec::new());
        let mut catalog = Catalog::new();
        catalog.insert(
            String::new(),
            vec!["</script>.png".to_string(), "<!--a&b-->.png".to_string()],
        );

        let html = render_index(&config, &catalog).unwrap();
        assert!(!html.contains("</script>.png"));
        assert!(!html.contains("<!--"));
        assert!(html.contains(r"\u003c/script\u003e.png"));
        assert!(html.contains(r"\u003c!--a\u0026b--\u003e.png"));
        assert!(!html.contains("<title><b></title>"));
    }

    #[test]
    fn test_embeddable_json_decodes_to_catalog() {
        let mut catalog = Catalog::new();
        catalog.insert("<g>".to_string(), vec!["a<!--&-->.png".to_string()]);

        let json = embeddable_json(&catalog).unwrap();
        let decoded: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, catalog);
    }

    #[test]
    fn test_render_index_counts_distinct_images() {
        let config = GalleryConfig::new(PathBuf::from("/srv/pets"), Vec::new());
        let mut catalog = Catalog::new();
        catalog.insert("a".to_string(), vec!["a1.png".to_string(), "ab2.png".to_string()]);
        catalog.insert("ab".to_string(), vec!["ab2.png".to_string()]);

        let html = render_index(&config, &catalog).unwrap();
        assert!(html.contains("2 image(s)"));
        assert!(!html.contains("3 image(s)"));
    }

    #[tokio::test]
    async fn test_index_empty_directory() {
        let dir = TempDir::new().unwrap();
        let state = state_with_ttl(&dir, Duration::ZERO);

        let response = index(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"{"":[]}"#));
        assert!(html.contains("0 image(s)"));
    }

    #[tokio::test]
    async fn test_index_is_cached() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.png"), b"x").unwrap();
        let state = state_with_ttl(&dir, Duration::from_secs(60));

        let first = body_text(index(State(state.clone())).await).await;
        fs::write(dir.path().join("two.png"), b"x").unwrap();
        let second = body_text(index(State(state)).await).await;

        assert_eq!(first, second);
        assert!(!second.contains("two.png"));
    }

    #[tokio::test]
    async fn test_index_uncached_sees_new_files() {
        let dir = TempDir::new().unwrap();
        let state = state_with_ttl(&dir, Duration::ZERO);

        let first = body_text(index(State(state.clone())).await).await;
        fs::write(dir.path().join("fresh.jpg"), b"x").unwrap();
        let second = body_text(index(State(state)).await).await;

        assert!(!first.contains("fresh.jpg"));
        assert!(second.contains("fresh.jpg"));
    }

    #[tokio::test]
    async fn test_index_unreadable_root() {
        let dir = TempDir::new().unwrap();
        let config = GalleryConfig::new(dir.path().join("vanished"), Vec::new())
            .with_cache_ttl(Duration::ZERO);
        let state = Arc::new(AppState::new(config));

        let response = index(State(state)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_gallery_script() {
        let response = gallery_script().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
        assert!(body_text(response).await.contains("changeImage"));
    }
}
