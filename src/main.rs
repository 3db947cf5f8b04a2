mod api;
mod catalog;
mod config;
mod error;
mod web_ui;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use clap::Parser;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::{Cli, GalleryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_gallery=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GalleryConfig::from_cli(&cli)?;
    tracing::info!("Serving images from {}", config.root.display());
    if config.prefixes.is_empty() {
        tracing::info!("Grouping images by their common prefix");
    } else {
        tracing::info!("Grouping images by prefixes: {}", config.prefixes.join(", "));
    }
    if config.cache_ttl.is_zero() {
        tracing::info!("Page cache disabled");
    } else {
        tracing::info!("Page cached for {}s", config.cache_ttl.as_secs());
    }

    let state = Arc::new(AppState::new(config));
    let app = app(state);

    let addr = SocketAddr::new(cli.host, cli.port);
    tracing::info!("Gallery starting on http://{}", addr);
    tracing::info!("Latest image: http://{}/latest", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gallery stopped");
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::router())
        .merge(web_ui::router())
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type,Authorization"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    struct RawResponse {
        status: u16,
        /// Lowercased names
        headers: Vec<(String, String)>,
    }

    impl RawResponse {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        }
    }

    async fn spawn_app(dir: &TempDir) -> SocketAddr {
        let config = GalleryConfig::new(dir.path().to_path_buf(), Vec::new())
            .with_cache_ttl(Duration::ZERO);
        let state = Arc::new(AppState::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });
        addr
    }

    async fn get(addr: SocketAddr, path: &str) -> RawResponse {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        let head = text.split("\r\n\r\n").next().unwrap();

        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .unwrap();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        RawResponse { status, headers }
    }

    #[tokio::test]
    async fn test_router_routes_and_cors_headers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a b.png"), b"png").unwrap();
        let addr = spawn_app(&dir).await;

        let cases = [
            ("/", 200),
            ("/health", 200),
            ("/catalog.json", 200),
            ("/latest", 200),
            ("/assets/gallery-v1.js", 200),
            ("/images/a%20b.png", 200),
            ("/images/nope.png", 404),
            ("/images/..%2Fetc", 400),
        ];

        for (path, expected) in cases {
            let response = get(addr, path).await;
            assert_eq!(response.status, expected, "status of {}", path);
            assert_eq!(response.header("access-control-allow-origin"), Some("*"), "{}", path);
            assert_eq!(response.header("access-control-allow-methods"), Some("GET"), "{}", path);
            assert_eq!(
                response.header("access-control-allow-headers"),
                Some("Content-Type,Authorization"),
                "{}",
                path
            );
        }

        let image = get(addr, "/images/a%20b.png").await;
        assert_eq!(image.header("content-type"), Some("image/png"));
    }

    #[tokio::test]
    async fn test_router_empty_directory() {
        let dir = TempDir::new().unwrap();
        let addr = spawn_app(&dir).await;

        assert_eq!(get(addr, "/").await.status, 200);
        assert_eq!(get(addr, "/latest").await.status, 404);
    }
}
