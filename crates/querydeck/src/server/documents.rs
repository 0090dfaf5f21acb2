//! Reference document (PDF) listing.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentInfo>,
}

/// GET /api/documents
///
/// Lists `*.pdf` files in the docs directory, sorted by name. A missing
/// directory is an empty list.
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    responses(
        (status = 200, body = DocumentsResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn list_documents(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let docs_dir = state.workspace.docs_dir();
    let configured_dir = state.workspace.config.docs_dir.clone();

    let documents = tokio::task::spawn_blocking(move || {
        let mut documents = Vec::new();
        let entries = match std::fs::read_dir(&docs_dir) {
            Ok(entries) => entries,
            Err(_) => return documents,
        };
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else { continue };
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(".pdf") {
                continue;
            }
            documents.push(DocumentInfo {
                name: name.to_string(),
                path: configured_dir.join(name).to_string_lossy().to_string(),
                size: metadata.len(),
            });
        }
        documents.sort_by(|left, right| left.name.cmp(&right.name));
        documents
    })
    .await
    .map_err(|e| ApiError::internal(format!("task failed: {e}")))?;

    Ok(Json(DocumentsResponse { documents }))
}
