//! Connected client bookkeeping

use dashmap::DashMap;

use crate::util::time::unix_millis;
use crate::ws::protocol::ClientId;

/// What the relay remembers about a live connection
#[derive(Debug, Clone, Copy)]
pub struct ConnectionInfo {
    pub connected_at: u64,
}

/// Registry of live connections. Written only by the relay hub.
pub struct ConnectionRegistry {
    connections: DashMap<ClientId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Returns false if the id was already registered
    pub fn insert(&self, id: ClientId) -> bool {
        self.connections
            .insert(
                id,
                ConnectionInfo {
                    connected_at: unix_millis(),
                },
            )
            .is_none()
    }

    pub fn remove(&self, id: &ClientId) -> Option<ConnectionInfo> {
        self.connections.remove(id).map(|(_, info)| info)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
