//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::{DisplayHandle, DisplaySession};
use crate::relay::{RelayHandle, RelayHub};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: RelayHandle,
    /// Present when the headless display is enabled
    pub display: Option<DisplayHandle>,
}

/// Background tasks the caller must spawn
pub struct Services {
    pub relay_hub: RelayHub,
    pub display: Option<DisplaySession>,
}

impl AppState {
    pub fn new(config: Config) -> (Self, Services) {
        let config = Arc::new(config);

        // Initialize relay hub
        let (relay_hub, relay) = RelayHub::new(config.relay_buffer);

        // The headless display subscribes like any other client
        let (display_session, display) = if config.headless_display {
            let (session, handle) = DisplaySession::new(config.sim.clone(), relay.subscribe());
            (Some(session), Some(handle))
        } else {
            (None, None)
        };

        let state = Self {
            config,
            relay,
            display,
        };

        let services = Services {
            relay_hub,
            display: display_session,
        };

        (state, services)
    }
}
