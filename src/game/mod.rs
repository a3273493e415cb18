//! Display-side game simulation
//!
//! Owns ships, bullets and enemies and applies relayed input events to them.
//! Runs inside a display's own frame loop; the relay never touches it.

pub mod combat;
pub mod entity;
pub mod input;
pub mod physics;
pub mod session;
pub mod simulation;
pub mod snapshot;
pub mod spawner;
pub mod timers;

pub use session::{DisplayHandle, DisplaySession};
pub use snapshot::WorldSnapshot;

/// Tunables for one display simulation
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Simulation area width
    pub world_width: f32,
    /// Simulation area height
    pub world_height: f32,
    /// Ship speed per unit of normalized stick input (units/s)
    pub move_factor: f32,
    /// Bullet speed (units/s)
    pub bullet_speed: f32,
    /// Forced bullet removal after this many seconds
    pub bullet_lifetime: f32,
    /// Seconds between enemy spawns
    pub spawn_interval: f32,
    /// Enemy speed when heading for a ship (units/s)
    pub enemy_speed: f32,
    /// Per-axis bound for enemy velocity when no ship exists
    pub enemy_random_speed: f32,
    /// Shoot vectors shorter than this fire along the ship's facing
    pub shoot_epsilon: f32,
    pub ship_radius: f32,
    pub bullet_radius: f32,
    pub enemy_radius: f32,
    /// RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 1280.0,
            world_height: 720.0,
            move_factor: 250.0,
            bullet_speed: 400.0,
            bullet_lifetime: 10.0,
            spawn_interval: 2.0,
            enemy_speed: 100.0,
            enemy_random_speed: 100.0,
            shoot_epsilon: 0.001,
            ship_radius: 15.0,
            bullet_radius: 5.0,
            enemy_radius: 15.0,
            seed: None,
        }
    }
}
