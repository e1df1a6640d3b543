//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::util::rate_limit::CommandRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection: join on open, route direction
/// commands while it lives, leave on close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    info!(connection_id = %connection_id, "new WebSocket connection");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Subscribe before joining so this connection sees its own join roster
    let mut events = state.room.subscribe();
    let (player, _roster) = state.room.join(connection_id);
    let player_id = player.id();

    // Writer task: room broadcasts -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(msg) => {
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(player_id, lagged_count = n, "client lagged, skipping {} broadcasts", n);
                    // Continue - don't disconnect for lag
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(player_id, "broadcast channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> command router
    let rate_limiter = CommandRateLimiter::new();
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_command() {
                    warn!(player_id, "rate limited command message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(ClientMsg::Direction { direction }) => {
                        state.room.apply_direction(connection_id, &direction);
                    }
                    Err(e) => {
                        warn!(player_id, error = %e, "failed to parse client message");
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!(player_id, "client initiated close");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.room.leave(connection_id);
    writer_handle.abort();

    info!(connection_id = %connection_id, player_id, "WebSocket connection closed");
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
