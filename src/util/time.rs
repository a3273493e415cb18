//! Time utilities for the relay and display simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Frame rate of the display simulation
pub const SIMULATION_TPS: u32 = 60;
/// Snapshots published per second
pub const SNAPSHOT_TPS: u32 = 20;

/// Delta time for one simulation frame (in seconds)
pub fn tick_delta() -> f32 {
    1.0 / SIMULATION_TPS as f32
}

/// Wall-clock duration of one simulation frame
pub fn tick_duration() -> Duration {
    Duration::from_micros(1_000_000 / SIMULATION_TPS as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_delta_matches_duration() {
        let from_duration = tick_duration().as_secs_f32();
        assert!((from_duration - tick_delta()).abs() < 1e-4);
    }

    #[test]
    fn snapshot_rate_divides_frame_rate() {
        assert_eq!(SIMULATION_TPS % SNAPSHOT_TPS, 0);
    }
}
