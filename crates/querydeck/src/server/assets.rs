//! Static UI bundle and reference PDF serving.

use axum::body::Body;
use axum::extract::{Path as PathParam, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::sync::Arc;

use crate::server::error::ApiError;
use crate::server::files::is_bare_name;
use crate::server::ServerState;

/// GET /
pub(crate) async fn serve_index(
    State(state): State<Arc<ServerState>>,
) -> Result<Response<Body>, ApiError> {
    let index = state.workspace.ui_dir().join("index.html");
    let bytes = tokio::fs::read(&index).await.map_err(|_| {
        ApiError::not_found("ui bundle not found; place index.html under the ui directory")
    })?;
    build_response(bytes, "text/html")
}

/// GET /ui/*path
pub(crate) async fn serve_ui_asset(
    State(state): State<Arc<ServerState>>,
    PathParam(asset_path): PathParam<String>,
) -> Result<Response<Body>, ApiError> {
    let base_dir = state
        .workspace
        .ui_dir()
        .canonicalize()
        .map_err(|_| ApiError::not_found("asset not found"))?;

    let requested = base_dir.join(&asset_path);
    let resolved = requested
        .canonicalize()
        .map_err(|_| ApiError::not_found("asset not found"))?;

    // Path traversal guard
    if !resolved.starts_with(&base_dir) {
        return Err(ApiError::forbidden("path traversal denied"));
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;

    let content_type = match resolved.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "html" => "text/html",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    };
    build_response(bytes, content_type)
}

/// GET /docs/:filename
///
/// Streams one reference PDF by bare filename.
pub(crate) async fn serve_document(
    State(state): State<Arc<ServerState>>,
    PathParam(filename): PathParam<String>,
) -> Result<Response<Body>, ApiError> {
    if !is_bare_name(&filename, ".pdf") {
        return Err(ApiError::bad_request("filename must be a bare .pdf name"));
    }

    let path = state.workspace.docs_dir().join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::not_found(format!("document not found: {filename}")))?;
    build_response(bytes, "application/pdf")
}

fn build_response(bytes: Vec<u8>, content_type: &str) -> Result<Response<Body>, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}
