//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::relay::RelayHandle;
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::protocol::{ClientFrame, ClientId, RelayFrame};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_id = ClientId::new();
    let (mut ws_sink, ws_stream) = socket.split();

    // Subscribe before connecting so the client sees its own tagged events
    let frame_rx = state.relay.subscribe();

    if let Err(e) = send_frame(&mut ws_sink, &RelayFrame::connected(client_id)).await {
        error!(client_id = %client_id, error = %e, "Failed to send greeting");
        return;
    }

    if let Err(e) = state.relay.connect(client_id).await {
        error!(client_id = %client_id, error = %e, "Relay unavailable");
        return;
    }

    let rate_limiter = ConnectionRateLimiter::new(state.config.input_rate_limit);
    run_session(client_id, ws_sink, ws_stream, &state.relay, frame_rx, rate_limiter).await;

    // Cleanup on disconnect
    if let Err(e) = state.relay.disconnect(client_id).await {
        debug!(client_id = %client_id, error = %e, "Relay gone before disconnect");
    }

    info!(client_id = %client_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    client_id: ClientId,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    relay: &RelayHandle,
    mut frame_rx: broadcast::Receiver<RelayFrame>,
    rate_limiter: ConnectionRateLimiter,
) {
    // Spawn writer task: relay broadcast -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match frame_rx.recv().await {
                Ok(frame) => {
                    if let Err(e) = send_frame(&mut ws_sink, &frame).await {
                        debug!(client_id = %client_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        client_id = %client_id,
                        lagged_count = n,
                        "Client lagged, skipping {} frames", n
                    );
                    // Continue - don't disconnect for lag
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(client_id = %client_id, "Relay channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> relay hub
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(client_id = %client_id, "Rate limited input frame");
                    continue;
                }

                match serde_json::from_str::<ClientFrame>(&text) {
                    Ok(frame) => {
                        if relay.event(client_id, frame.event, frame.data).await.is_err() {
                            debug!(client_id = %client_id, "Relay hub closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(client_id = %client_id, error = %e, "Failed to parse client frame");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(client_id = %client_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(client_id = %client_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(client_id = %client_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Abort writer task
    writer_handle.abort();
}

/// Frame send failures
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("socket send failed: {0}")]
    Socket(#[from] axum::Error),
}

/// Send a frame over WebSocket
async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    frame: &RelayFrame,
) -> Result<(), SendError> {
    let json = serde_json::to_string(frame)?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}
