//! Ad-hoc SQL execution and CSV export endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::db::{self, QueryResult};
use crate::export::{export_filename, render_csv};
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecuteRequest {
    pub sql: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub success: bool,
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
    pub row_count: usize,
    pub sql: String,
}

/// POST /api/execute
///
/// Runs a read-only SELECT against the workspace database.
#[utoipa::path(
    post,
    path = "/api/execute",
    tag = "execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, body = ExecuteResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 403, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn execute(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let sql = payload.sql;
    let result = run_select(&state, sql.clone()).await?;
    Ok(Json(ExecuteResponse {
        success: true,
        columns: result.columns,
        rows: result.rows,
        row_count: result.row_count,
        sql,
    }))
}

/// POST /api/export
///
/// Runs the same guarded SELECT and responds with a CSV attachment.
#[utoipa::path(
    post,
    path = "/api/export",
    tag = "execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "CSV attachment"),
        (status = 400, body = ApiErrorResponse),
        (status = 403, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn export(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Response<Body>, ApiError> {
    let result = run_select(&state, payload.sql).await?;
    let csv = render_csv(&result);
    let filename = export_filename();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(csv))
        .map_err(|e| ApiError::internal(e.to_string()))
}

async fn run_select(state: &ServerState, sql: String) -> Result<QueryResult, ApiError> {
    let db_path = state.workspace.database_path();
    tracing::debug!(sql = %sql.chars().take(80).collect::<String>(), "executing query");

    let result = tokio::task::spawn_blocking(move || db::execute_select(&db_path, &sql))
        .await
        .map_err(|e| ApiError::internal(format!("task failed: {e}")))??;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests_support::test_state;
    use rusqlite::Connection;
    use tempfile::tempdir;

    #[tokio::test]
    async fn execute_round_trips_rows() {
        let dir = tempdir().expect("tempdir");
        let state = test_state(dir.path()).await;
        let conn = Connection::open(state.workspace.database_path()).expect("create db");
        conn.execute_batch(
            "CREATE TABLE people (name TEXT, age INTEGER);
             INSERT INTO people VALUES ('Ada', 36);",
        )
        .expect("seed");
        drop(conn);

        let Json(response) = execute(
            State(state),
            Json(ExecuteRequest {
                sql: "SELECT name, age FROM people".to_string(),
            }),
        )
        .await
        .expect("execute");
        assert!(response.success);
        assert_eq!(response.row_count, 1);
        assert_eq!(response.columns, vec!["name", "age"]);
        assert_eq!(response.rows[0]["name"], "Ada");
        assert_eq!(response.sql, "SELECT name, age FROM people");
    }

    #[tokio::test]
    async fn execute_rejects_non_select() {
        let dir = tempdir().expect("tempdir");
        let state = test_state(dir.path()).await;
        let result = execute(
            State(state),
            Json(ExecuteRequest {
                sql: "DROP TABLE people".to_string(),
            }),
        )
        .await;
        assert!(result.is_err());
    }
}
