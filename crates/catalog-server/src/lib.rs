pub mod admin;
pub mod config;
pub mod filters;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod templates;

pub use admin::{AdminSite, ModelAdmin};
pub use config::{AdminConfig, AppConfig, LoggingConfig, ServerConfig, StorageConfig};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{AppState, CatalogServer, ServerBuilder, build_app, create_configured_storage};
