//! Relay hub task and its handle

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::ws::protocol::{ClientId, RelayFrame};

use super::{ClientConnection, ConnectionRegistry, Relay};

/// Inputs processed by the hub, one at a time
#[derive(Debug, Clone)]
pub enum RelayInput {
    Connect {
        client_id: ClientId,
    },
    Event {
        client_id: ClientId,
        event: String,
        data: Value,
    },
    Disconnect {
        client_id: ClientId,
    },
}

/// Relay error types
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Relay hub has shut down")]
    Closed,
}

/// Cloneable handle used by connections and displays
#[derive(Clone)]
pub struct RelayHandle {
    input_tx: mpsc::Sender<RelayInput>,
    frame_tx: broadcast::Sender<RelayFrame>,
    registry: Arc<ConnectionRegistry>,
}

impl RelayHandle {
    /// Receive every frame broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RelayFrame> {
        self.frame_tx.subscribe()
    }

    pub async fn connect(&self, client_id: ClientId) -> Result<(), RelayError> {
        self.send(RelayInput::Connect { client_id }).await
    }

    pub async fn event(&self, client_id: ClientId, event: String, data: Value) -> Result<(), RelayError> {
        self.send(RelayInput::Event {
            client_id,
            event,
            data,
        })
        .await
    }

    pub async fn disconnect(&self, client_id: ClientId) -> Result<(), RelayError> {
        self.send(RelayInput::Disconnect { client_id }).await
    }

    pub fn connected_clients(&self) -> usize {
        self.registry.len()
    }

    async fn send(&self, input: RelayInput) -> Result<(), RelayError> {
        self.input_tx.send(input).await.map_err(|_| RelayError::Closed)
    }
}

/// The relay loop. Owns the handlers and the only writer to the registry.
pub struct RelayHub {
    relay: Relay,
    input_rx: mpsc::Receiver<RelayInput>,
    frame_tx: broadcast::Sender<RelayFrame>,
}

impl RelayHub {
    pub fn new(buffer: usize) -> (Self, RelayHandle) {
        let buffer = buffer.max(1);
        let (input_tx, input_rx) = mpsc::channel(buffer);
        let (frame_tx, _) = broadcast::channel(buffer);
        let registry = Arc::new(ConnectionRegistry::new());

        let handle = RelayHandle {
            input_tx,
            frame_tx: frame_tx.clone(),
            registry: registry.clone(),
        };

        let hub = Self {
            relay: Relay::new(registry),
            input_rx,
            frame_tx,
        };

        (hub, handle)
    }

    /// Process inputs until every handle is dropped
    pub async fn run(mut self) {
        info!("Relay hub started");

        while let Some(input) = self.input_rx.recv().await {
            if let Some(frame) = self.process(input) {
                // No subscribers is not an error; the frame is simply dropped
                if self.frame_tx.send(frame).is_err() {
                    debug!("No subscribers for relayed frame");
                }
            }
        }

        info!("Relay hub stopped");
    }

    fn process(&mut self, input: RelayInput) -> Option<RelayFrame> {
        match input {
            RelayInput::Connect { client_id } => {
                self.relay.on_connect(client_id);
                None
            }
            RelayInput::Event {
                client_id,
                event,
                data,
            } => self
                .relay
                .on_event(ClientConnection { id: client_id }, &event, data),
            RelayInput::Disconnect { client_id } => self.relay.on_disconnect(client_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::protocol::EventName;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_frame(rx: &mut broadcast::Receiver<RelayFrame>) -> RelayFrame {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("frame within timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn tagged_events_reach_every_subscriber_including_sender() {
        let (hub, handle) = RelayHub::new(16);
        tokio::spawn(hub.run());

        let a = ClientId::new();
        let b = ClientId::new();
        let mut display = handle.subscribe();
        let mut a_rx = handle.subscribe();
        let mut b_rx = handle.subscribe();
        handle.connect(a).await.unwrap();
        handle.connect(b).await.unwrap();

        handle
            .event(a, "launcherUpdate".into(), json!({"dx": 1, "dy": 0}))
            .await
            .unwrap();
        handle
            .event(b, "launcherUpdate".into(), json!({"dx": 0, "dy": -1}))
            .await
            .unwrap();

        for rx in [&mut display, &mut a_rx, &mut b_rx] {
            let first = next_frame(rx).await;
            assert_eq!(first.event, EventName::LauncherUpdate);
            assert_eq!(first.data["id"], json!(a.to_string()));

            let second = next_frame(rx).await;
            assert_eq!(second.data["id"], json!(b.to_string()));
            assert_eq!(second.data["dy"], json!(-1));
        }
        assert_eq!(handle.connected_clients(), 2);
    }

    #[tokio::test]
    async fn disconnect_broadcasts_departure() {
        let (hub, handle) = RelayHub::new(16);
        tokio::spawn(hub.run());

        let mut display = handle.subscribe();
        let id = ClientId::new();
        handle.connect(id).await.unwrap();
        handle.disconnect(id).await.unwrap();

        let frame = next_frame(&mut display).await;
        assert_eq!(frame, RelayFrame::player_disconnected(id));
        assert_eq!(handle.connected_clients(), 0);
    }

    #[tokio::test]
    async fn debug_events_are_swallowed() {
        let (hub, handle) = RelayHub::new(16);
        tokio::spawn(hub.run());

        let mut display = handle.subscribe();
        let id = ClientId::new();
        handle.connect(id).await.unwrap();
        handle.event(id, "debug".into(), json!("hello")).await.unwrap();
        handle
            .event(id, "changeColor".into(), json!("#00ff00"))
            .await
            .unwrap();

        // The debug line never shows up; the colour change is next
        let frame = next_frame(&mut display).await;
        assert_eq!(frame.event, EventName::ChangeColor);
    }

    #[test]
    fn handle_reports_closed_hub() {
        let (hub, handle) = RelayHub::new(4);
        drop(hub);
        let result = tokio_test::block_on(handle.connect(ClientId::new()));
        assert!(matches!(result, Err(RelayError::Closed)));
    }
}
