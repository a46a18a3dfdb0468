//! Fake static asset server for fetch tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `GET /{name}` from an in-memory map; unknown names are
//! 404. Every request's `Cache-Control` header is recorded so tests can check
//! that fetches bypass caches.
//!
//! # Example
//!
//! ```rust,no_run
//! let server = FakeAssetServer::start().await.unwrap();
//! server.put("data.xlsx", WorkbookFixture::sample().to_bytes()).await;
//! let url = server.url("data.xlsx");
//! ```

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct AssetState {
    files: HashMap<String, Vec<u8>>,
    cache_control: Vec<Option<String>>,
}

/// Handle to the running fake asset server.
pub struct FakeAssetServer {
    addr: SocketAddr,
    state: Arc<Mutex<AssetState>>,
}

impl FakeAssetServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(AssetState::default()));

        let app = Router::new()
            .route("/{name}", get(serve_asset))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// URL of an asset on this server.
    pub fn url(&self, name: &str) -> String {
        format!("http://{}/{}", self.addr, name)
    }

    pub async fn put(&self, name: &str, bytes: Vec<u8>) {
        self.state.lock().await.files.insert(name.to_string(), bytes);
    }

    /// `Cache-Control` values seen so far, one per request.
    pub async fn cache_control_seen(&self) -> Vec<Option<String>> {
        self.state.lock().await.cache_control.clone()
    }
}

async fn serve_asset(
    Path(name): Path<String>,
    State(state): State<Arc<Mutex<AssetState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    let cache_control = headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.cache_control.push(cache_control);

    match state.files.get(&name) {
        Some(bytes) => (StatusCode::OK, bytes.clone()),
        None => (StatusCode::NOT_FOUND, Vec::new()),
    }
}
