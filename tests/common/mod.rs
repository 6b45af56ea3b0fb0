#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use trimly::api::handlers::{health_handler, redirect_handler};
use trimly::api::routes::api_routes;
use trimly::application::services::{ClickService, LinkService};
use trimly::domain::click_event::ClickEvent;
use trimly::infrastructure::cache::{CacheService, MemoryCache};
use trimly::infrastructure::geo::NoopGeoLookup;
use trimly::infrastructure::persistence::MemoryStore;
use trimly::state::AppState;

/// Everything a test needs to drive the HTTP surface and inspect side effects.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Builds services over one in-memory store acting as both repositories.
pub fn create_test_state(
    queue_capacity: usize,
) -> (
    AppState,
    Arc<MemoryStore>,
    Arc<MemoryCache>,
    mpsc::Receiver<ClickEvent>,
) {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new(300, 1_000));
    let (tx, rx) = mpsc::channel(queue_capacity);

    let link_service = Arc::new(LinkService::new(store.clone(), cache.clone()));
    let click_service = Arc::new(ClickService::new(
        store.clone(),
        store.clone(),
        Arc::new(NoopGeoLookup),
    ));

    let state = AppState::new(
        link_service,
        click_service,
        cache.clone() as Arc<dyn CacheService>,
        tx,
        false,
    );

    (state, store, cache, rx)
}

/// Same routes as the production router, without rate limiting.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .route("/{code}", get(redirect_handler))
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_queue(100)
}

pub fn spawn_app_with_queue(queue_capacity: usize) -> TestApp {
    let (state, store, cache, click_rx) = create_test_state(queue_capacity);
    let server = TestServer::new(test_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        store,
        cache,
        click_rx,
    }
}

/// Registers a link through the API and returns the response body.
pub async fn create_link(server: &TestServer, body: serde_json::Value) -> serde_json::Value {
    let response = server.post("/api/links").json(&body).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()
}
