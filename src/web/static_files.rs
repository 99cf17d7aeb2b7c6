//! Static file serving for the Reading Atlas page.
//!
//! The page, its script and stylesheet are embedded in the binary. In debug
//! builds rust-embed reads them from disk, so edits show up on reload.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::Path;

/// Embedded static files from the `web/static` directory.
#[derive(Embed)]
#[folder = "web/static"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.svg"]
#[include = "*.png"]
#[include = "*.webp"]
#[include = "*.ico"]
pub struct StaticAssets;

const PAGE: &str = "index.html";

/// Fallback handler for every path the API routes do not claim.
///
/// `/` and client-side paths get the page, known assets are served as-is,
/// while unknown `/api/` routes and missing asset files are 404s.
pub async fn serve_static(request: Request) -> Response {
    let path = request.uri().path().trim_start_matches('/');

    if path.is_empty() {
        return page();
    }

    if let Some(response) = asset_response(path) {
        return response;
    }

    if path.starts_with("api/") {
        return (StatusCode::NOT_FOUND, "Unknown API route").into_response();
    }

    if Path::new(path).extension().is_some_and(|ext| !ext.is_empty()) {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }

    page()
}

fn page() -> Response {
    asset_response(PAGE)
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "Page not embedded").into_response())
}

/// Response for embedded asset `path`, or `None` if there is no such asset.
fn asset_response(path: &str) -> Option<Response> {
    let asset = StaticAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, cache_control_for_path(path))
        .body(Body::from(asset.data.into_owned()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    Some(response)
}

/// HTML is always revalidated so a redeploy with new data shows up at once;
/// scripts, styles and images may be cached for an hour.
fn cache_control_for_path(path: &str) -> &'static str {
    if Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    {
        "no-cache, must-revalidate"
    } else {
        "public, max-age=3600"
    }
}

/// Whether the page itself made it into the binary.
#[must_use]
pub fn page_is_embedded() -> bool {
    StaticAssets::get(PAGE).is_some()
}
