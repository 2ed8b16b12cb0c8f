#![allow(dead_code)]

use std::sync::Arc;

use catalog_db_memory::{InMemoryStorage, load_fixtures};
use catalog_server::{AppConfig, build_app};
use tokio::task::JoinHandle;

pub const FIXTURES: &str = include_str!("../../../../fixtures/catalog.json");

pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    shutdown: tokio::sync::oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("request")
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

pub async fn start_server() -> TestServer {
    start_server_with(AppConfig::default()).await
}

/// Serve the seeded catalog on an ephemeral port.
pub async fn start_server_with(config: AppConfig) -> TestServer {
    let storage = Arc::new(InMemoryStorage::new());
    load_fixtures(storage.as_ref(), FIXTURES)
        .await
        .expect("load fixtures");
    let app = build_app(&config, storage).expect("build app");

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client");

    TestServer {
        base: format!("http://{addr}"),
        client,
        shutdown: tx,
        handle,
    }
}
