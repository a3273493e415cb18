//! WebSocket protocol message definitions
//! These are the wire types for client-relay communication

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque per-connection session id, issued at connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Named events of the realtime channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    /// Continuous movement vector from a controller stick
    LauncherUpdate,
    /// Fire-direction vector at the moment of release
    Shoot,
    /// Legacy single-shot impulse
    Launch,
    /// Cosmetic tint change, `"#RRGGBB"`
    ChangeColor,
    /// Departure notice carrying the leaving client's id
    PlayerDisconnected,
    /// Free-text log line, never broadcast
    Debug,
    /// Greeting sent to a freshly connected client with its own id
    Connected,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LauncherUpdate => "launcherUpdate",
            Self::Shoot => "shoot",
            Self::Launch => "launch",
            Self::ChangeColor => "changeColor",
            Self::PlayerDisconnected => "playerDisconnected",
            Self::Debug => "debug",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for EventName {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "launcherUpdate" => Ok(Self::LauncherUpdate),
            "shoot" => Ok(Self::Shoot),
            "launch" => Ok(Self::Launch),
            "changeColor" => Ok(Self::ChangeColor),
            "playerDisconnected" => Ok(Self::PlayerDisconnected),
            "debug" => Ok(Self::Debug),
            "connected" => Ok(Self::Connected),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Frame sent from a client to the relay.
///
/// The event name stays a plain string here so that unknown names can be
/// logged and ignored by the relay instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Frame fanned out by the relay to every connected client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    pub event: EventName,
    #[serde(default)]
    pub data: Value,
}

impl RelayFrame {
    pub fn new(event: EventName, data: Value) -> Self {
        Self { event, data }
    }

    /// Greeting carrying the receiving client's own id
    pub fn connected(id: ClientId) -> Self {
        Self::new(EventName::Connected, Value::String(id.to_string()))
    }

    /// Departure notice for a disconnected client
    pub fn player_disconnected(id: ClientId) -> Self {
        Self::new(EventName::PlayerDisconnected, Value::String(id.to_string()))
    }
}

/// Attach the sender's id to a payload.
///
/// Objects get (or have overwritten) an `id` field. Any other payload
/// contributes no fields and becomes `{"id": ...}`.
pub fn tag_sender(payload: Value, id: ClientId) -> Value {
    let id = Value::String(id.to_string());
    match payload {
        Value::Object(mut fields) => {
            fields.insert("id".to_string(), id);
            Value::Object(fields)
        }
        _ => serde_json::json!({ "id": id }),
    }
}
