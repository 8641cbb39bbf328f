mod assets;

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::http::{header, HeaderValue};
use axum::response::{Html, IntoResponse};
use axum::{extract::State, routing::get, Router};
use seatmap_shared::models::Venue;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

/// Venue JSON, serialized once at startup and shared by every request.
#[derive(Clone)]
struct VenueBody(Bytes);

impl VenueBody {
    fn new(venue: &Venue) -> serde_json::Result<Self> {
        serde_json::to_vec(venue).map(|json| VenueBody(Bytes::from(json)))
    }
}

async fn venue_handler(State(VenueBody(body)): State<VenueBody>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Static trees: venue drawings from `assets_dir`, the built bundle from
/// `dist_dir`.
fn static_files(assets_dir: &Path, dist_dir: &Path) -> Router {
    Router::new()
        .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
        .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        )
}

fn build_app(venue: &Venue, assets_dir: &Path) -> serde_json::Result<Router> {
    let app = Router::new()
        .route("/api/venue", get(venue_handler))
        .route("/", get(serve_index))
        .route("/static-venue", get(serve_index))
        .with_state(VenueBody::new(venue)?)
        .merge(static_files(assets_dir, Path::new("dist")))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());
    Ok(app)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let assets_dir =
        PathBuf::from(std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()));
    let venue = assets::VenueAssets::load_or_empty(&assets_dir).venue;
    let app = build_app(&venue, &assets_dir)?;

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!(
        %addr,
        assets = %assets_dir.display(),
        "Server running at http://localhost:{}",
        port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn serve_index() -> Html<String> {
    match std::fs::read_to_string("dist/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Venue Seating</title></head>
<body>
<h1>Venue Seating</h1>
<p>Frontend not built yet. The venue data is available at <a href="/api/venue">/api/venue</a>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}
