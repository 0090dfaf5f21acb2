//! SQL library file endpoints.

use std::sync::Arc;

use axum::extract::{Path as PathParam, State};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::loader::list_sql_file_names;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlFileInfo {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlFilesResponse {
    pub files: Vec<SqlFileInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlFileContentResponse {
    pub content: String,
}

/// GET /api/sql-files
///
/// Lists the `*.sql` files in the library directory. A missing directory is
/// an empty list, not an error.
#[utoipa::path(
    get,
    path = "/api/sql-files",
    tag = "files",
    responses(
        (status = 200, body = SqlFilesResponse),
    )
)]
pub(crate) async fn list_files(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<SqlFilesResponse>, ApiError> {
    let sql_dir = state.workspace.sql_dir();
    let names = tokio::task::spawn_blocking(move || list_sql_file_names(&sql_dir))
        .await
        .map_err(|e| ApiError::internal(format!("task failed: {e}")))?
        .unwrap_or_default();

    let configured_dir = state.workspace.config.sql_dir.clone();
    let files = names
        .into_iter()
        .map(|name| SqlFileInfo {
            path: configured_dir.join(&name).to_string_lossy().to_string(),
            name,
        })
        .collect();
    Ok(Json(SqlFilesResponse { files }))
}

/// GET /api/sql-files/:filename
///
/// Returns the raw text of one library file. The filename must be a bare
/// `*.sql` name with no path separators.
#[utoipa::path(
    get,
    path = "/api/sql-files/{filename}",
    tag = "files",
    params(("filename" = String, Path, description = "Bare .sql filename")),
    responses(
        (status = 200, body = SqlFileContentResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 404, body = ApiErrorResponse),
    )
)]
pub(crate) async fn file_content(
    State(state): State<Arc<ServerState>>,
    PathParam(filename): PathParam<String>,
) -> Result<Json<SqlFileContentResponse>, ApiError> {
    if !is_bare_name(&filename, ".sql") {
        return Err(ApiError::bad_request("filename must be a bare .sql name"));
    }

    let path = state.workspace.sql_dir().join(&filename);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| ApiError::not_found(format!("file not found: {filename}")))?;
    Ok(Json(SqlFileContentResponse { content }))
}

/// A plain filename with the expected extension: no separators, no dot-prefix.
pub(crate) fn is_bare_name(name: &str, extension: &str) -> bool {
    name.ends_with(extension)
        && name.len() > extension.len()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}
