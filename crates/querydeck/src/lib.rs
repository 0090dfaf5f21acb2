pub mod catalog;
pub mod db;
pub mod error;
pub mod export;
pub mod server;
pub mod storage;
pub mod utils;
pub mod workspace;

pub use crate::error::{DashboardError, Result};
pub use crate::server::Server;
pub use crate::workspace::WorkspaceInstance;
