// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live notification streaming.
//!
//! Clients open a WebSocket on `/live` and receive the transient messages
//! the wizards publish: validation summaries, submission outcomes. The
//! stream is informational only; session state is always read over HTTP.
//! A `session_id` query parameter narrows the stream to one session.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use upscalex::Notification;

use crate::AppState;

/// Messages sent over the live stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A message for the user of a session.
    Notification(Notification),
    /// Some notifications were dropped because the client fell behind.
    Lagged {
        /// How many were dropped.
        skipped: u64,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

/// Query parameters of the live stream.
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    /// Only stream notifications for this session.
    pub session_id: Option<String>,
}

impl LiveQuery {
    fn wants(&self, notification: &Notification) -> bool {
        self.session_id
            .as_deref()
            .is_none_or(|id| id == notification.session_id)
    }
}

/// Upgrades the connection and streams notifications until the client
/// goes away.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<LiveQuery>,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    let rx: broadcast::Receiver<Notification> = app_state.service.hub().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx, query))
}

fn encode(event: &LiveEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!(?e, "Failed to serialize live event");
            None
        }
    }
}

/// Returns the next event for this client, or `None` once the hub is gone.
async fn next_event(
    rx: &mut broadcast::Receiver<Notification>,
    query: &LiveQuery,
) -> Option<LiveEvent> {
    loop {
        match rx.recv().await {
            Ok(notification) if query.wants(&notification) => {
                return Some(LiveEvent::Notification(notification));
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                return Some(LiveEvent::Lagged { skipped });
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    mut rx: broadcast::Receiver<Notification>,
    query: LiveQuery,
) {
    info!(session_id = ?query.session_id, "Client connected to live stream");

    let (mut sender, mut receiver) = socket.split();

    let connected_event: LiveEvent = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Some(message) = encode(&connected_event)
        && sender.send(message).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = next_event(&mut rx, &query).await {
            if let Some(message) = encode(&event)
                && sender.send(message).await.is_err()
            {
                // Client disconnected
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live stream");
}
