//! Relay websocket endpoint.
//!
//! One socket per client. The client steers its own room membership with
//! `join`/`leave` control frames and pushes `broadcast` frames after its
//! REST calls succeed; the relay fans those out to the rooms. The endpoint
//! performs no authorization: any connection that knows a list id may join
//! its room, and malformed frames are dropped silently, in keeping with
//! the channel's best-effort contract.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::value::RawValue;
use tokio::sync::mpsc;

use super::AppState;
use crate::constants::RELAY_QUEUE_DEPTH;
use crate::list::ListId;
use crate::relay::{ConnectionId, Envelope, EventKind, Outbox};

/// Control frames a client may send over the relay socket.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "lowercase", rename_all_fields = "camelCase")]
enum ClientFrame {
    Join {
        list_id: ListId,
    },
    Leave {
        list_id: ListId,
    },
    Broadcast {
        event: EventKind,
        list_id: ListId,
        payload: Option<Box<RawValue>>,
    },
}

/// Handler for GET /ws - upgrade to the relay channel
pub(crate) async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let conn = ConnectionId::mint();
    let (outbox, mut inbox) = mpsc::channel::<String>(RELAY_QUEUE_DEPTH);
    let (mut sink, mut stream) = socket.split();

    tracing::debug!("Relay connection {conn} opened");

    // Writer half: drain relay frames into the socket until either side closes.
    let writer = tokio::spawn(async move {
        while let Some(frame) = inbox.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => handle_frame(&state, conn, &outbox, text.as_str()),
            Message::Close(_) => break,
            // Pings are answered by the underlying protocol layer.
            _ => {}
        }
    }

    // Membership lifecycle is tied to the socket.
    state.relay.disconnect(&conn);
    writer.abort();
    tracing::debug!("Relay connection {conn} closed");
}

fn handle_frame(state: &AppState, conn: ConnectionId, outbox: &Outbox, text: &str) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!("Ignoring malformed relay frame from {conn}: {e}");
            return;
        }
    };

    match frame {
        ClientFrame::Join { list_id } => {
            state.relay.join(list_id, conn, outbox.clone());
        }
        ClientFrame::Leave { list_id } => {
            state.relay.leave(&list_id, &conn);
        }
        ClientFrame::Broadcast {
            event,
            list_id,
            payload,
        } => {
            state.relay.publish(&Envelope {
                event,
                list_id,
                payload,
            });
        }
    }
}
