//! Relayed input events and their decoding
//!
//! Payloads arrive exactly as controllers sent them, so decoding is
//! defensive: missing or junk axis values read as zero and are clamped to
//! the normalized range.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ws::protocol::EventName;

use super::entity::PlayerId;

/// Input the simulation understands
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MoveUpdate { id: PlayerId, dx: f32, dy: f32 },
    Shoot { id: PlayerId, dx: f32, dy: f32 },
    ColorChange { color: Tint },
    Disconnect { id: PlayerId },
}

/// Payload decoding failures. Logged and otherwise ignored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{0} payload is not an object")]
    NotAnObject(EventName),

    #[error("{0} payload has no player id")]
    MissingId(EventName),

    #[error("invalid colour: {0}")]
    InvalidColor(String),
}

/// RGB tint parsed from `"#RRGGBB"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(u32);

impl FromStr for Tint {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(hex, 16).map(Tint).map_err(|_| invalid())
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Tint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decodes one event's payload
pub type Decoder = fn(&Value) -> Result<InputEvent, InputError>;

/// Event-name to decoder table.
///
/// `None` means the simulation takes no action for that event. `launch` is
/// the deprecated impulse model and is intentionally unmapped.
pub fn decoder_for(event: EventName) -> Option<Decoder> {
    match event {
        EventName::LauncherUpdate => Some(decode_move),
        EventName::Shoot => Some(decode_shoot),
        EventName::ChangeColor => Some(decode_color),
        EventName::PlayerDisconnected => Some(decode_disconnect),
        EventName::Launch | EventName::Debug | EventName::Connected => None,
    }
}

fn decode_move(data: &Value) -> Result<InputEvent, InputError> {
    let (id, dx, dy) = decode_vector(EventName::LauncherUpdate, data)?;
    Ok(InputEvent::MoveUpdate { id, dx, dy })
}

fn decode_shoot(data: &Value) -> Result<InputEvent, InputError> {
    let (id, dx, dy) = decode_vector(EventName::Shoot, data)?;
    Ok(InputEvent::Shoot { id, dx, dy })
}

fn decode_color(data: &Value) -> Result<InputEvent, InputError> {
    match data {
        Value::String(s) => Ok(InputEvent::ColorChange {
            color: s.trim().parse()?,
        }),
        other => Err(InputError::InvalidColor(other.to_string())),
    }
}

fn decode_disconnect(data: &Value) -> Result<InputEvent, InputError> {
    let id = match data {
        Value::String(id) => Some(id.clone()),
        Value::Object(fields) => player_id(fields),
        _ => None,
    };
    id.map(|id| InputEvent::Disconnect { id })
        .ok_or(InputError::MissingId(EventName::PlayerDisconnected))
}

fn decode_vector(event: EventName, data: &Value) -> Result<(PlayerId, f32, f32), InputError> {
    let fields = data.as_object().ok_or(InputError::NotAnObject(event))?;
    let id = player_id(fields).ok_or(InputError::MissingId(event))?;
    Ok((id, axis(fields, "dx"), axis(fields, "dy")))
}

fn player_id(fields: &Map<String, Value>) -> Option<PlayerId> {
    match fields.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        _ => None,
    }
}

/// Missing, non-numeric and non-finite values read as 0
fn axis(fields: &Map<String, Value>, key: &str) -> f32 {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v.clamp(-1.0, 1.0))
}
