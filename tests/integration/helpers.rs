//! Test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;
use uuid::Uuid;

use lobby_api::app::build_app;
use lobby_api::state::AppState;
use lobby_auth::{IdentityResolver, JwtDecoder, JwtEncoder};
use lobby_cache::SessionCache;
use lobby_core::config::AppConfig;
use lobby_database::{IdentityStore, MemoryUserStore};
use lobby_entity::User;
use lobby_realtime::RealtimeEngine;
use lobby_realtime::connection::HeartbeatConfig;
use lobby_realtime::HubSettings;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for any single frame.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test application context: a live server on an ephemeral port plus the
/// pieces needed to mint identities and tokens for it.
pub struct TestApp {
    pub router: Router,
    pub addr: SocketAddr,
    pub store: MemoryUserStore,
    pub encoder: JwtEncoder,
    pub engine: RealtimeEngine,
}

impl TestApp {
    /// Create a test app with production heartbeat timings.
    pub async fn new() -> Self {
        Self::with_settings(HubSettings::default()).await
    }

    /// Create a test app whose heartbeat runs on the given timings.
    pub async fn with_heartbeat(ping_interval: Duration, liveness_timeout: Duration) -> Self {
        Self::with_settings(HubSettings {
            heartbeat: HeartbeatConfig {
                ping_interval,
                liveness_timeout,
            },
            ..HubSettings::default()
        })
        .await
    }

    async fn with_settings(settings: HubSettings) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.auth.leeway_seconds = 0;
        let config = Arc::new(config);

        let store = MemoryUserStore::new();
        let identities: Arc<dyn IdentityStore> = Arc::new(store.clone());
        let decoder = JwtDecoder::new(&config.auth).expect("Failed to build decoder");
        let encoder = JwtEncoder::new(&config.auth).expect("Failed to build encoder");

        let resolver = Arc::new(IdentityResolver::new(
            Arc::new(decoder),
            Arc::new(SessionCache::from_config(&config.cache)),
            Arc::clone(&identities),
        ));
        let engine = RealtimeEngine::with_settings(settings, Arc::clone(&resolver));

        let state = AppState::new(config, resolver, engine.clone(), identities);
        let router = build_app(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let served = router.clone();
        tokio::spawn(async move {
            axum::serve(listener, served).await.expect("Test server failed");
        });

        Self {
            router,
            addr,
            store,
            encoder,
            engine,
        }
    }

    /// Register a user in the identity store and return it.
    pub fn create_test_user(&self, username: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{username}@test.local"),
            username: username.to_string(),
        };
        self.store.insert(user.clone());
        user
    }

    /// Mint a valid access token for `user_id`.
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.encoder
            .issue(user_id)
            .expect("Failed to issue token")
            .0
    }

    /// Mint a token that expired an hour ago.
    pub fn expired_token_for(&self, user_id: Uuid) -> String {
        self.encoder
            .issue_with_ttl(user_id, chrono::Duration::hours(-1))
            .expect("Failed to issue token")
            .0
    }

    /// Make an HTTP request to the test app.
    pub async fn request(&self, method: &str, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Open a WebSocket, passing `token` in the query string when given.
    pub async fn connect(&self, token: Option<&str>) -> WsClient {
        let url = match token {
            Some(token) => format!("ws://{}/ws?token={token}", self.addr),
            None => format!("ws://{}/ws", self.addr),
        };
        let (ws, _) = connect_async(url).await.expect("WebSocket connect failed");
        ws
    }

    /// Open a WebSocket, passing `token` in the `Authorization` header.
    pub async fn connect_with_header(&self, token: &str) -> WsClient {
        let mut request = format!("ws://{}/ws", self.addr)
            .into_client_request()
            .expect("Failed to build upgrade request");
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().expect("Invalid header"),
        );
        let (ws, _) = connect_async(request)
            .await
            .expect("WebSocket connect failed");
        ws
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Next JSON text message, skipping transport control frames.
///
/// Returns `None` once the server closes the socket.
pub async fn next_json(ws: &mut WsClient) -> Option<Value> {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for a frame");
        match frame {
            Some(Ok(Message::Text(text))) => {
                return Some(serde_json::from_str(text.as_str()).expect("Server sent invalid JSON"));
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
            Some(Ok(Message::Binary(_))) => panic!("Server sent a binary frame"),
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
        }
    }
}

/// Next message whose `type` is not `ping`.
pub async fn next_event(ws: &mut WsClient) -> Option<Value> {
    loop {
        let msg = next_json(ws).await?;
        if msg["type"] != "ping" {
            return Some(msg);
        }
    }
}

/// Wait until the server closes the socket, ignoring anything sent first.
pub async fn expect_closed(ws: &mut WsClient) {
    while next_json(ws).await.is_some() {}
}

/// Send a text frame.
pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.into()))
        .await
        .expect("Failed to send text frame");
}

/// Answer a server ping.
pub async fn send_pong(ws: &mut WsClient, conn_id: &str) {
    let pong = serde_json::json!({"type": "pong", "payload": conn_id});
    send_text(ws, &pong.to_string()).await;
}

/// Poll `check` until it holds or five seconds elapse.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
