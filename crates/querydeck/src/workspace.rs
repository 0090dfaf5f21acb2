pub mod config;
pub mod instance;

pub use config::{
    config_path, load_or_create_config, DashboardConfig, ServerConfig, DASHBOARD_CONFIG_FILENAME,
    DASHBOARD_CONFIG_VERSION,
};
pub use instance::WorkspaceInstance;
