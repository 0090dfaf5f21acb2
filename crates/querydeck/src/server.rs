use axum::routing::{get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{load_catalog, QueryParser};
use crate::db;
use crate::error::{DashboardError, Result};
use crate::storage::file::FileStorage;
use crate::storage::SharedStorage;
use crate::workspace::WorkspaceInstance;

pub mod assets;
pub mod catalog;
pub mod documents;
pub mod error;
pub mod execute;
pub mod files;
pub mod openapi;
pub mod session;
pub mod system;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    workspace: WorkspaceInstance,
}

impl Server {
    /// Loads the workspace, scans the SQL library, probes the database and
    /// starts serving. A port override of 0 binds an ephemeral port.
    pub async fn new(workspace_dir: PathBuf, port_override: Option<u16>) -> Result<Self> {
        let workspace = WorkspaceInstance::load(&workspace_dir)?;

        let sql_dir = workspace.sql_dir();
        let loaded = tokio::task::spawn_blocking(move || {
            load_catalog(&sql_dir, &QueryParser::new())
        })
        .await
        .map_err(|error| DashboardError::Internal(format!("catalog load task failed: {error}")))?;
        *workspace.catalog.write().await = loaded;

        let db_path = workspace.database_path();
        let probed = tokio::task::spawn_blocking(move || db::probe(&db_path))
            .await
            .map_err(|error| DashboardError::Internal(format!("db probe task failed: {error}")))?;
        match probed {
            Ok(tables) => {
                tracing::info!(tables = tables.len(), "connected to database");
            }
            Err(error) => {
                tracing::warn!(%error, "starting without database");
            }
        }

        let storage: SharedStorage = Arc::new(FileStorage::new(workspace.storage_dir()));
        let state = Arc::new(ServerState {
            workspace: workspace.clone(),
            storage,
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        let app = Router::new()
            .route("/health", get(health))
            .route("/api/status", get(system::status))
            .route("/api/execute", post(execute::execute))
            .route("/api/export", post(execute::export))
            .route("/api/queries", get(catalog::list_queries))
            .route("/api/sections", get(catalog::list_sections))
            .route("/api/catalog/reload", post(catalog::reload))
            .route("/api/sql-files", get(files::list_files))
            .route("/api/sql-files/:filename", get(files::file_content))
            .route("/api/documents", get(documents::list_documents))
            .route("/docs/:filename", get(assets::serve_document))
            .route("/", get(assets::serve_index))
            .route("/ui/*path", get(assets::serve_ui_asset))
            .route("/api/session", get(session::get_session))
            .route("/api/session/favorites", put(session::set_favorite))
            .route("/api/session/editor", put(session::save_editor))
            .route("/api/openapi.json", get(openapi::serve_openapi))
            .with_state(state)
            .layer(cors);

        #[cfg(feature = "swagger-ui")]
        let app = {
            use utoipa::OpenApi;
            app.merge(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                    .url("/api/openapi.json", openapi::ApiDoc::openapi()),
            )
        };

        let host = workspace.config.server.host.clone();
        let port = port_override.unwrap_or(workspace.config.server.port);
        let listener = TcpListener::bind((host.as_str(), port)).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            workspace,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(sender) = self.shutdown.take() {
            sender.send(()).map_err(|_| {
                DashboardError::Internal("failed to send server shutdown signal".to_string())
            })
        } else {
            Ok(())
        }
    }

    pub fn workspace(&self) -> &WorkspaceInstance {
        &self.workspace
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

async fn health() -> &'static str {
    "ok"
}

pub(crate) struct ServerState {
    pub(crate) workspace: WorkspaceInstance,
    pub(crate) storage: SharedStorage,
}
