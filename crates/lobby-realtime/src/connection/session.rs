//! Per-connection control loop, independent of the WebSocket library.
//!
//! The transport is a stream of inbound [`Frame`]s and a sink of outbound
//! text. The HTTP layer adapts its socket halves to these; tests use
//! in-memory channels.

use std::fmt::Display;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use lobby_auth::AuthFailure;

use super::handle::ConnectionHandle;
use crate::hub::ConnectionHub;
use crate::message::builder;

/// Upper bound on waiting for the transport to accept a close.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// An inbound transport frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text.
    Text(String),
    /// Binary data.
    Binary(Vec<u8>),
    /// Transport-level ping.
    Ping,
    /// Transport-level pong.
    Pong,
    /// The peer is closing.
    Close,
}

/// Releases the connection when the session ends, however it ends.
struct SessionGuard {
    hub: Arc<ConnectionHub>,
    handle: Arc<ConnectionHandle>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.release(&self.handle);
    }
}

/// Run one connection from authentication to close.
///
/// On authentication failure a single `connection` message with
/// `authorized: false` is written and the transport closed; nothing is
/// registered. Otherwise the connection is admitted, greeted, announced to
/// everyone, and served until the peer leaves, the transport fails, or the
/// hub releases it.
pub async fn serve_connection<I, E, O>(
    hub: Arc<ConnectionHub>,
    credential: Option<String>,
    inbound: I,
    outbound: O,
) where
    I: Stream<Item = Result<Frame, E>>,
    E: Display,
    O: Sink<String> + Send + 'static,
    O::Error: Display + Send,
{
    let user = match hub.resolver().resolve(credential.as_deref()).await {
        Ok(user) => user,
        Err(failure) => {
            reject(outbound, &failure).await;
            return;
        }
    };

    let (handle, rx) = hub.admit(user);
    let guard = SessionGuard {
        hub: Arc::clone(&hub),
        handle: Arc::clone(&handle),
    };
    let writer = tokio::spawn(write_loop(Arc::clone(&handle), rx, outbound));

    if let Err(e) = handle.send(&builder::welcome(&handle.user)) {
        warn!(conn_id = %handle.id, error = %e, "Failed to queue welcome message");
    }
    let report = hub.bus().broadcast(&builder::user_joined(&handle.user));
    debug!(
        conn_id = %handle.id,
        delivered = report.delivered,
        failed = report.failed,
        "Join notice broadcast"
    );

    read_loop(&hub, &handle, inbound).await;

    drop(guard);
    if let Err(e) = writer.await {
        error!(conn_id = %handle.id, error = %e, "Writer task failed");
    }
}

async fn reject<O>(outbound: O, failure: &AuthFailure)
where
    O: Sink<String>,
    O::Error: Display,
{
    let mut outbound = pin!(outbound);
    info!(reason = %failure, "WebSocket authentication failed");

    match builder::auth_failure(&failure.to_string()).encode() {
        Ok(text) => {
            if let Err(e) = outbound.send(text).await {
                debug!(error = %e, "Failed to deliver authentication failure");
            }
        }
        Err(e) => error!(error = %e, "Failed to serialize authentication failure"),
    }

    if tokio::time::timeout(CLOSE_TIMEOUT, outbound.close()).await.is_err() {
        debug!("Transport did not close in time");
    }
}

async fn read_loop<I, E>(hub: &ConnectionHub, handle: &ConnectionHandle, inbound: I)
where
    I: Stream<Item = Result<Frame, E>>,
    E: Display,
{
    let mut inbound = pin!(inbound);

    loop {
        let next = tokio::select! {
            _ = handle.closed() => break,
            next = inbound.next() => next,
        };

        match next {
            Some(Ok(Frame::Text(text))) => {
                hub.dispatch(handle, &text);
            }
            Some(Ok(Frame::Ping | Frame::Pong)) => {}
            Some(Ok(Frame::Binary(_))) => {
                debug!(conn_id = %handle.id, "Non-text frame received, closing");
                break;
            }
            Some(Ok(Frame::Close)) | None => {
                debug!(conn_id = %handle.id, "Peer closed connection");
                break;
            }
            Some(Err(e)) => {
                debug!(conn_id = %handle.id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }
}

async fn write_loop<O>(handle: Arc<ConnectionHandle>, mut rx: mpsc::Receiver<Arc<str>>, outbound: O)
where
    O: Sink<String>,
    O::Error: Display,
{
    let mut outbound = pin!(outbound);

    loop {
        let text = tokio::select! {
            biased;
            _ = handle.closed() => break,
            text = rx.recv() => match text {
                Some(text) => text,
                None => break,
            },
        };

        // A stalled write is abandoned once the connection is released.
        let sent = tokio::select! {
            biased;
            _ = handle.closed() => break,
            sent = outbound.send(text.to_string()) => sent,
        };
        if let Err(e) = sent {
            debug!(conn_id = %handle.id, error = %e, "WebSocket send error");
            handle.close();
            break;
        }
    }

    if tokio::time::timeout(CLOSE_TIMEOUT, outbound.close()).await.is_err() {
        debug!(conn_id = %handle.id, "Transport did not close in time");
    }
}
