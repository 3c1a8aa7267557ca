//! Test utilities for clever-client
//!
//! [`MockBackend`] is a local HTTP server that stands in for the Clever
//! backend: it answers with canned JSON per method and path and records every
//! request it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{ClientConfig, Result, Transport};

/// Wrap `data` in a successful backend envelope
pub fn envelope(data: Value) -> Value {
    json!({
        "status": true,
        "statusMessage": "Success",
        "timestamp": "2024-03-15T12:00:00.000+0100",
        "data": data,
    })
}

/// Successful envelope without a data field
pub fn acknowledgement() -> Value {
    json!({
        "status": true,
        "statusMessage": "Success",
        "timestamp": "2024-03-15T12:00:00.000+0100",
    })
}

/// Canned response for one route
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub status: u16,
    pub body: Option<Value>,
    pub delay: Option<Duration>,
}

impl MockRoute {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
            delay: None,
        }
    }

    pub fn status(status: u16, body: Option<Value>) -> Self {
        Self {
            status,
            body,
            delay: None,
        }
    }

    /// Hold the response back, e.g. to outlast the client timeout
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the mock backend
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path with repeated slashes collapsed
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), MockRoute>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A mock backend server that shuts down when dropped
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockBackend {
    /// Start a server on an ephemeral local port
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(MockState::default());

        let router = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration aimed at this server with a short timeout
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url(),
            request_timeout_secs: 1,
            connect_timeout_secs: 1,
        }
    }

    /// Owned transport aimed at this server
    pub fn transport(&self) -> Result<Arc<Transport>> {
        Ok(Arc::new(Transport::new(self.config())?))
    }

    /// Answer `method path` with a 200 and `body`
    pub fn respond(&self, method: &str, path: &str, body: Value) {
        self.respond_with(method, path, MockRoute::json(body));
    }

    pub fn respond_with(&self, method: &str, path: &str, route: MockRoute) {
        self.state
            .routes
            .lock()
            .insert((method.to_uppercase(), normalize_path(path)), route);
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests received for one path
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let path = normalize_path(path);
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().clear();
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }
    normalized
}

async fn handle_request(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Response {
    let path = normalize_path(uri.path());
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: if body.is_empty() {
            None
        } else {
            serde_json::from_slice(&body).ok()
        },
    };
    state.requests.lock().push(recorded);

    let route = state
        .routes
        .lock()
        .get(&(method.to_string(), path.clone()))
        .cloned();

    let Some(route) = route else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": false,
                "statusMessage": format!("No route for {} {}", method, path),
                "timestamp": "",
            })),
        )
            .into_response();
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match route.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}

/// Wait for a condition with timeout
pub async fn wait_for<F>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    condition()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/api//v2/customer/KEY/getProfile"),
            "/api/v2/customer/KEY/getProfile"
        );
        assert_eq!(normalize_path("/api/mobile"), "/api/mobile");
    }
}
