use axum::Json;
use utoipa::OpenApi;

use crate::catalog::{Query, SectionCount};
use crate::db::QueryResult;
use crate::server::catalog::{QueriesResponse, ReloadResponse, SectionsResponse};
use crate::server::documents::{DocumentInfo, DocumentsResponse};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::execute::{ExecuteRequest, ExecuteResponse};
use crate::server::files::{SqlFileContentResponse, SqlFileInfo, SqlFilesResponse};
use crate::server::session::{
    EditorRequest, EditorResponse, FavoriteRequest, FavoritesResponse, SessionResponse,
};
use crate::server::system::{CatalogStatus, DatabaseStatus, StatusResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Querydeck API",
        version = "0.1.0",
        description = "Local SQL query dashboard"
    ),
    paths(
        crate::server::system::status,
        crate::server::execute::execute,
        crate::server::execute::export,
        crate::server::catalog::list_queries,
        crate::server::catalog::list_sections,
        crate::server::catalog::reload,
        crate::server::files::list_files,
        crate::server::files::file_content,
        crate::server::documents::list_documents,
        crate::server::session::get_session,
        crate::server::session::set_favorite,
        crate::server::session::save_editor,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Catalog
        Query,
        SectionCount,
        QueriesResponse,
        SectionsResponse,
        ReloadResponse,
        // Execution
        ExecuteRequest,
        ExecuteResponse,
        QueryResult,
        // Files and documents
        SqlFileInfo,
        SqlFilesResponse,
        SqlFileContentResponse,
        DocumentInfo,
        DocumentsResponse,
        // Session
        SessionResponse,
        FavoriteRequest,
        FavoritesResponse,
        EditorRequest,
        EditorResponse,
        // Status
        StatusResponse,
        DatabaseStatus,
        CatalogStatus,
    )),
    tags(
        (name = "catalog", description = "Query library browsing"),
        (name = "execute", description = "Ad-hoc SQL execution and export"),
        (name = "files", description = "SQL library files"),
        (name = "documents", description = "Reference documents"),
        (name = "session", description = "Favorites and editor persistence"),
        (name = "system", description = "Server status"),
    )
)]
pub struct ApiDoc;

/// GET /api/openapi.json
pub(crate) async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
