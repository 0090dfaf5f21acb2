//! Server/database/catalog status endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub catalog: CatalogStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub path: String,
    pub connected: bool,
    pub tables: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub queries: usize,
    pub files_loaded: usize,
    pub files_requested: usize,
}

/// GET /api/status
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "system",
    responses(
        (status = 200, body = StatusResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn status(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let db_path = state.workspace.database_path();
    let display_path = db_path.to_string_lossy().to_string();
    let probed = tokio::task::spawn_blocking(move || db::probe(&db_path))
        .await
        .map_err(|e| ApiError::internal(format!("task failed: {e}")))?;
    let database = match probed {
        Ok(tables) => DatabaseStatus {
            path: display_path,
            connected: true,
            tables: tables.len(),
        },
        Err(_) => DatabaseStatus {
            path: display_path,
            connected: false,
            tables: 0,
        },
    };

    let catalog = state.workspace.catalog.read().await;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        catalog: CatalogStatus {
            queries: catalog.queries.len(),
            files_loaded: catalog.files_loaded,
            files_requested: catalog.files_requested,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests_support::test_state;
    use rusqlite::Connection;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reports_missing_database_as_disconnected() {
        let dir = tempdir().expect("tempdir");
        let state = test_state(dir.path()).await;
        let Json(status) = status(State(state)).await.expect("status");
        assert_eq!(status.status, "ok");
        assert!(!status.database.connected);
        assert_eq!(status.catalog.queries, 0);
    }

    #[tokio::test]
    async fn reports_table_count_when_connected() {
        let dir = tempdir().expect("tempdir");
        let state = test_state(dir.path()).await;
        let conn = Connection::open(state.workspace.database_path()).expect("create db");
        conn.execute_batch("CREATE TABLE people (id INTEGER);")
            .expect("seed");
        drop(conn);

        let Json(status) = status(State(state)).await.expect("status");
        assert!(status.database.connected);
        assert_eq!(status.database.tables, 1);
    }
}
