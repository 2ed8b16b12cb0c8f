use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use catalog_db_memory::{StorageBackend, create_storage, load_fixtures_file};
use catalog_storage::DynStorage;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::admin::AdminSite;
use crate::filters::Filters;
use crate::middleware::{self as app_middleware, RequestId};
use crate::templates::Templates;
use crate::{config::AppConfig, handlers, routes};

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
    pub config: Arc<AppConfig>,
    pub filters: Arc<Filters>,
    pub admin: Arc<AdminSite>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, storage: DynStorage) -> anyhow::Result<Self> {
        Ok(Self {
            storage,
            config: Arc::new(cfg.clone()),
            filters: Arc::new(Filters::new()?),
            admin: Arc::new(AdminSite::new(cfg.admin.list_per_page)?),
            templates: Arc::new(Templates::new()?),
        })
    }
}

pub fn build_app(cfg: &AppConfig, storage: DynStorage) -> anyhow::Result<Router> {
    let state = AppState::new(cfg, storage)?;
    let body_limit = cfg.server.body_limit_bytes;

    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .merge(routes::pages::router())
        .merge(routes::api::router())
        .merge(routes::admin::router())
        .with_state(state)
        // Layers run bottom-up: request id first, so spans can carry it.
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.as_str().to_string())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id));

    Ok(app)
}

pub struct CatalogServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    storage: Option<DynStorage>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            storage: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Use an existing storage instead of creating one from the config.
    /// Fixtures are not loaded into it.
    pub fn with_storage(mut self, storage: DynStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub async fn build(self) -> anyhow::Result<CatalogServer> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => create_configured_storage(&self.config).await?,
        };
        let app = build_app(&self.config, storage)?;

        Ok(CatalogServer {
            addr: self.addr,
            app,
        })
    }
}

/// Storage backend named in the config, seeded from the fixture file if one
/// is configured.
pub async fn create_configured_storage(cfg: &AppConfig) -> anyhow::Result<DynStorage> {
    let backend: StorageBackend = cfg.storage.backend.parse()?;
    let storage = create_storage(backend);
    if let Some(path) = &cfg.storage.fixtures {
        load_fixtures_file(storage.as_ref(), path).await?;
    }
    Ok(storage)
}

impl CatalogServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use catalog_db_memory::InMemoryStorage;
    use catalog_storage::CatalogStorage;
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(&AppConfig::default(), Arc::new(InMemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_books() {
        let res = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/books/");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let res = app()
            .oneshot(
                Request::get("/healthz")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn generated_request_id_when_missing() {
        let res = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_eq!(id.len(), 36);
    }

    #[tokio::test]
    async fn configured_storage_loads_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"model": "books.author", "pk": 1, "fields": {"name": "Mary Shelley"}}]"#,
        )
        .unwrap();
        let mut cfg = AppConfig::default();
        cfg.storage.fixtures = Some(path.to_string_lossy().into_owned());

        let storage = create_configured_storage(&cfg).await.unwrap();
        assert_eq!(storage.count_authors().await.unwrap(), 1);
    }
}
