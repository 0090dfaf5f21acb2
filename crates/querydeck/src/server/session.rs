//! Session persistence endpoints: favorites and the last-edited SQL text.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;
use crate::storage::Storage;

const SESSION_SCOPE: &str = "session";
const FAVORITES_KEY: &str = "favorites";
const EDITOR_KEY: &str = "editor";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub favorites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_query: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    /// Query id to mark or unmark.
    pub id: String,
    pub favorite: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditorRequest {
    pub sql: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorResponse {
    pub saved: bool,
}

/// GET /api/session
///
/// The persisted favorites and last-edited SQL, both optional.
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "session",
    responses(
        (status = 200, body = SessionResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_session(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let favorites = read_favorites(state.storage.as_ref()).await?;
    let last_query = read_editor(state.storage.as_ref()).await?;
    Ok(Json(SessionResponse {
        favorites,
        last_query,
    }))
}

/// PUT /api/session/favorites
///
/// Adds or removes one query id; responds with the updated set.
#[utoipa::path(
    put,
    path = "/api/session/favorites",
    tag = "session",
    request_body = FavoriteRequest,
    responses(
        (status = 200, body = FavoritesResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn set_favorite(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let id = payload.id.trim().to_string();
    if id.is_empty() {
        return Err(ApiError::bad_request("missing id"));
    }

    let mut favorites = read_favorites(state.storage.as_ref()).await?;
    if payload.favorite {
        if !favorites.contains(&id) {
            favorites.push(id);
        }
    } else {
        favorites.retain(|existing| existing != &id);
    }
    // Stored sorted so the file on disk is stable across sessions.
    favorites.sort();

    state
        .storage
        .write(&[SESSION_SCOPE, FAVORITES_KEY], &json!(favorites))
        .await?;
    Ok(Json(FavoritesResponse { favorites }))
}

/// PUT /api/session/editor
///
/// Persists the last-edited SQL text.
#[utoipa::path(
    put,
    path = "/api/session/editor",
    tag = "session",
    request_body = EditorRequest,
    responses(
        (status = 200, body = EditorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn save_editor(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<EditorRequest>,
) -> Result<Json<EditorResponse>, ApiError> {
    state
        .storage
        .write(&[SESSION_SCOPE, EDITOR_KEY], &json!({ "sql": payload.sql }))
        .await?;
    Ok(Json(EditorResponse { saved: true }))
}

async fn read_favorites(storage: &dyn Storage) -> Result<Vec<String>, ApiError> {
    let value = storage.read(&[SESSION_SCOPE, FAVORITES_KEY]).await?;
    match value {
        Some(value) => serde_json::from_value(value)
            .map_err(|error| ApiError::internal(format!("corrupt favorites entry: {error}"))),
        None => Ok(Vec::new()),
    }
}

async fn read_editor(storage: &dyn Storage) -> Result<Option<String>, ApiError> {
    let value = storage.read(&[SESSION_SCOPE, EDITOR_KEY]).await?;
    Ok(value
        .and_then(|value| value.get("sql").cloned())
        .and_then(|sql| sql.as_str().map(ToString::to_string)))
}
