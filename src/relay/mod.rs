//! Transport relay - fans input events out to every connected client
//!
//! The relay holds no simulation state. It tags movement and shoot events
//! with the sender's id, passes everything else through untouched, and
//! announces departures.

pub mod hub;
pub mod registry;

pub use hub::{RelayHandle, RelayHub};
pub use registry::ConnectionRegistry;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::util::time::unix_millis;
use crate::ws::protocol::{tag_sender, ClientId, EventName, RelayFrame};

/// A live client session as seen by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConnection {
    pub id: ClientId,
}

/// Relay event handlers. Every call runs to completion and yields at most
/// one frame to broadcast.
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
}

impl Relay {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn on_connect(&self, id: ClientId) -> ClientConnection {
        if self.registry.insert(id) {
            info!(
                client_id = %id,
                connected = self.registry.len(),
                "Client connected"
            );
        } else {
            debug!(client_id = %id, "Client already registered");
        }
        ClientConnection { id }
    }

    /// Handle a named event from `conn`. Returns the frame to broadcast, if any.
    pub fn on_event(&self, conn: ClientConnection, event: &str, payload: Value) -> Option<RelayFrame> {
        let name = match event.parse::<EventName>() {
            Ok(name) => name,
            Err(e) => {
                debug!(client_id = %conn.id, error = %e, payload = %payload, "Ignoring event");
                return None;
            }
        };

        match name {
            EventName::LauncherUpdate | EventName::Shoot => {
                debug!(client_id = %conn.id, event = %name, payload = %payload, "Relaying event");
                Some(RelayFrame::new(name, tag_sender(payload, conn.id)))
            }
            EventName::Launch | EventName::ChangeColor => {
                debug!(client_id = %conn.id, event = %name, payload = %payload, "Relaying event");
                Some(RelayFrame::new(name, payload))
            }
            EventName::Debug => {
                let text = match &payload {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                info!(client_id = %conn.id, message = %text, "Client debug");
                None
            }
            // Relay-originated names are never accepted from clients
            EventName::PlayerDisconnected | EventName::Connected => {
                debug!(
                    client_id = %conn.id,
                    event = %name,
                    payload = %payload,
                    "Ignoring relay-only event from client"
                );
                None
            }
        }
    }

    /// Forget `id` and produce the departure notice. Unknown ids yield nothing.
    pub fn on_disconnect(&self, id: ClientId) -> Option<RelayFrame> {
        let info = self.registry.remove(&id)?;
        info!(
            client_id = %id,
            connected = self.registry.len(),
            session_ms = unix_millis().saturating_sub(info.connected_at),
            "Client disconnected"
        );
        Some(RelayFrame::player_disconnected(id))
    }
}
