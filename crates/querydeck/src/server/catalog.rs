//! Catalog browsing endpoints: filtered query list, section tabs, reload.

use std::sync::Arc;

use axum::extract::{Query as QueryParams, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::{filter, load_catalog, section_counts, Query, QueryParser, SectionCount, ALL_SECTIONS};
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct QueryFilterParams {
    /// Section label, or "all". Defaults to "all".
    pub section: Option<String>,
    /// Case-insensitive search term. Defaults to empty.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueriesResponse {
    pub queries: Vec<Query>,
    /// Visible count after filtering.
    pub count: usize,
    /// Total catalog size.
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionsResponse {
    pub sections: Vec<SectionCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub queries_loaded: usize,
    pub files_loaded: usize,
    pub files_requested: usize,
}

/// GET /api/queries
///
/// The filtered catalog view, preserving catalog order.
#[utoipa::path(
    get,
    path = "/api/queries",
    tag = "catalog",
    params(QueryFilterParams),
    responses(
        (status = 200, body = QueriesResponse),
    )
)]
pub(crate) async fn list_queries(
    State(state): State<Arc<ServerState>>,
    QueryParams(params): QueryParams<QueryFilterParams>,
) -> Json<QueriesResponse> {
    let section = params.section.unwrap_or_else(|| ALL_SECTIONS.to_string());
    let search = params.search.unwrap_or_default();

    let catalog = state.workspace.catalog.read().await;
    let visible: Vec<Query> = filter(&catalog.queries, &section, &search)
        .into_iter()
        .cloned()
        .collect();
    Json(QueriesResponse {
        count: visible.len(),
        total: catalog.queries.len(),
        queries: visible,
    })
}

/// GET /api/sections
///
/// Section-tab counts from the unfiltered catalog.
#[utoipa::path(
    get,
    path = "/api/sections",
    tag = "catalog",
    responses(
        (status = 200, body = SectionsResponse),
    )
)]
pub(crate) async fn list_sections(
    State(state): State<Arc<ServerState>>,
) -> Json<SectionsResponse> {
    let catalog = state.workspace.catalog.read().await;
    Json(SectionsResponse {
        sections: section_counts(&catalog.queries),
    })
}

/// POST /api/catalog/reload
///
/// Re-scans the SQL library and swaps in the fresh catalog.
#[utoipa::path(
    post,
    path = "/api/catalog/reload",
    tag = "catalog",
    responses(
        (status = 200, body = ReloadResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn reload(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let sql_dir = state.workspace.sql_dir();
    let loaded = tokio::task::spawn_blocking(move || load_catalog(&sql_dir, &QueryParser::new()))
        .await
        .map_err(|e| ApiError::internal(format!("task failed: {e}")))?;

    let response = ReloadResponse {
        queries_loaded: loaded.queries.len(),
        files_loaded: loaded.files_loaded,
        files_requested: loaded.files_requested,
    };
    *state.workspace.catalog.write().await = loaded;
    Ok(Json(response))
}
