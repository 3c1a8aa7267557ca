//! HTTP transport to the Clever backend

use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use clever_core::SchemaError;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ConnectionError, Result};

/// Credentials of the official mobile app; the backend drops other traffic
const MOBILE_APP_AUTHORIZATION: &str = "Basic bW9iaWxlYXBwOmFwaWtleQ==";

#[derive(Debug)]
enum Session {
    /// Owned client not built yet
    Unopened,
    Open(Client),
    Closed,
}

/// Owns the HTTP client, applies the request timeout and maps failures.
///
/// A transport built with [`Transport::new`] creates its client lazily on the
/// first request and releases it on [`Transport::close`]. One built with
/// [`Transport::with_client`] uses the host's shared client, which it never
/// closes.
#[derive(Debug)]
pub struct Transport {
    config: ClientConfig,
    base_url: Url,
    session: Mutex<Session>,
    owns_client: bool,
}

impl Transport {
    /// Transport that builds and owns its own HTTP client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            config,
            base_url,
            session: Mutex::new(Session::Unopened),
            owns_client: true,
        })
    }

    /// Transport over a client shared by the host
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            config,
            base_url,
            session: Mutex::new(Session::Open(client)),
            owns_client: false,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Release the owned HTTP client. Later requests fail with
    /// [`ConnectionError::Closed`]. Does nothing for a shared client or when
    /// already closed.
    pub fn close(&self) {
        if !self.owns_client {
            return;
        }
        let mut session = self.session.lock();
        if !matches!(*session, Session::Closed) {
            *session = Session::Closed;
            info!("Clever transport closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.session.lock(), Session::Closed)
    }

    fn http_client(&self) -> std::result::Result<Client, ConnectionError> {
        let mut session = self.session.lock();
        match &*session {
            Session::Open(client) => Ok(client.clone()),
            Session::Closed => Err(ConnectionError::Closed),
            Session::Unopened => {
                let client = Client::builder()
                    .connect_timeout(self.config.connect_timeout())
                    .build()
                    .map_err(|e| ConnectionError::Transport(e.to_string()))?;
                debug!("Created HTTP client for {}", self.base_url);
                *session = Session::Open(client.clone());
                Ok(client)
            }
        }
    }

    /// Call an endpoint and return its JSON payload.
    ///
    /// An empty response body yields `Value::Null`.
    #[instrument(skip_all, fields(endpoint = endpoint.name()))]
    pub async fn call(&self, endpoint: &Endpoint<'_>, body: Option<&Value>) -> Result<Value> {
        let url = endpoint.url(&self.base_url)?;
        self.request(endpoint.method(), url, body).await
    }

    /// Send one request with the client identification headers.
    pub async fn request(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value> {
        let client = self.http_client()?;

        let mut request = client.request(method, url).headers(client_headers());
        if let Some(body) = body {
            request = request.json(body);
        }

        let timeout = self.config.request_timeout();
        let bytes = match tokio::time::timeout(timeout, async {
            let response = request.send().await.map_err(map_reqwest_error)?;
            let status = response.status();
            if !status.is_success() {
                let message = rejection_message(response).await;
                return Err(ConnectionError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            response.bytes().await.map_err(map_reqwest_error)
        })
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "Request to Clever backend timed out");
                return Err(ConnectionError::Timeout.into());
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| SchemaError::new("response body", e.to_string()).into())
    }
}

fn client_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_static(MOBILE_APP_AUTHORIZATION),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn map_reqwest_error(e: reqwest::Error) -> ConnectionError {
    if e.is_timeout() {
        ConnectionError::Timeout
    } else {
        ConnectionError::Transport(e.to_string())
    }
}

/// Prefer the envelope's `statusMessage`, fall back to the raw body
async fn rejection_message(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("statusMessage")?.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                text
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url() {
        let result = Transport::new(ClientConfig::with_base_url("not a url"));
        assert!(result.is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let transport = Transport::new(ClientConfig::default()).unwrap();
        assert!(!transport.is_closed());
        transport.close();
        transport.close();
        assert!(transport.is_closed());
        assert_eq!(transport.http_client().unwrap_err(), ConnectionError::Closed);
    }

    #[test]
    fn test_shared_client_is_never_closed() {
        let transport = Transport::with_client(ClientConfig::default(), Client::new()).unwrap();
        transport.close();
        assert!(!transport.is_closed());
    }

    #[test]
    fn test_client_headers_identify_mobile_app() {
        let headers = client_headers();
        assert_eq!(headers[AUTHORIZATION], MOBILE_APP_AUTHORIZATION);
    }
}
