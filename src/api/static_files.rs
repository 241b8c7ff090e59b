//! Frontend delivery — embedded query-builder UI with an optional
//! filesystem override for development.

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::Response,
};
use mime_guess::from_path;
use rust_embed::RustEmbed;
use std::path::PathBuf;

/// The query-builder UI, compiled into the binary.
#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Assets;

/// Resolve a request path against the override directory (when configured)
/// and then the embedded assets. The UI is a single page, so pathless
/// requests get `index.html`.
pub async fn serve_static(uri: Uri, static_dir: Option<String>) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    if let Some(ref dir) = static_dir {
        let file_path = PathBuf::from(dir).join(path);
        if let Ok(content) = tokio::fs::read(&file_path).await {
            return file_response(path, content.into());
        }
    }

    match Assets::get(path) {
        Some(asset) => file_response(path, Body::from(asset.data)),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("404 Not Found"))
            .unwrap(),
    }
}

fn file_response(path: &str, body: Body) -> Response {
    let mime = from_path(path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(body)
        .unwrap()
}
