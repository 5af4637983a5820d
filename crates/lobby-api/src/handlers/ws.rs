//! WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::Response;
use futures::{SinkExt, StreamExt, future};
use serde::Deserialize;

use lobby_auth::extract_credential;
use lobby_realtime::{ConnectionHub, Frame, serve_connection};

use crate::state::AppState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Bearer token. Browsers cannot set headers on an upgrade request.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}: WebSocket upgrade
///
/// The upgrade is always accepted; authentication runs on the open socket so
/// that a failure can be reported as a `connection` message before closing.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let credential = extract_credential(query.token.as_deref(), authorization).map(str::to_owned);
    let hub = Arc::clone(&state.realtime.hub);

    ws.on_upgrade(move |socket| handle_socket(hub, credential, socket))
}

async fn handle_socket(hub: Arc<ConnectionHub>, credential: Option<String>, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();

    let outbound = ws_tx.with(|text: String| {
        future::ready(Ok::<_, axum::Error>(Message::Text(text.into())))
    });
    let inbound = ws_rx.map(|result| result.map(to_frame));

    serve_connection(hub, credential, inbound, outbound).await;
}

fn to_frame(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text.as_str().to_owned()),
        Message::Binary(data) => Frame::Binary(data.to_vec()),
        Message::Ping(_) => Frame::Ping,
        Message::Pong(_) => Frame::Pong,
        Message::Close(_) => Frame::Close,
    }
}
