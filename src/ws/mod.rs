//! Realtime channel: wire types and the websocket endpoint

pub mod handler;
pub mod protocol;
