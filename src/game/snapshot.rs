//! Snapshot building for the rendering side

use serde::Serialize;

use super::entity::{Entity, EntityId, EntityKind, PlayerId};
use super::simulation::{SimEvent, Simulation};

/// Ship state in a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ShipSnapshot {
    pub player: PlayerId,
    pub entity: EntityId,
    pub x: f32,
    pub y: f32,
    /// Rotation in radians
    pub rotation: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    /// False exactly once, in the first snapshot after the ship was destroyed
    pub alive: bool,
}

/// Bullet or enemy state in a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub entity: EntityId,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    /// Firing ship, bullets only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<EntityId>,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    /// Simulation time in seconds
    pub time: f64,
    pub width: f32,
    pub height: f32,
    /// Current tint as `#rrggbb`
    pub tint: Option<String>,
    pub ships: Vec<ShipSnapshot>,
    pub enemies: Vec<BodySnapshot>,
    pub bullets: Vec<BodySnapshot>,
    /// Events since the previous snapshot
    pub events: Vec<SimEvent>,
}

/// Builds snapshots at a fixed tick interval
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for important events)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot, draining the simulation's pending events
    pub fn build(&mut self, sim: &mut Simulation) -> WorldSnapshot {
        let events = sim.drain_events();
        let bounds = sim.bounds();

        let mut snapshot = WorldSnapshot {
            tick: sim.tick(),
            time: sim.time(),
            width: bounds.width,
            height: bounds.height,
            tint: sim.tint().map(|t| t.to_string()),
            events,
            ..WorldSnapshot::default()
        };

        for entity in sim.entities() {
            match &entity.kind {
                EntityKind::Ship { player } => snapshot.ships.push(ship(entity, player)),
                EntityKind::Bullet { origin, .. } => {
                    snapshot.bullets.push(body(entity, Some(*origin)))
                }
                EntityKind::Enemy => snapshot.enemies.push(body(entity, None)),
            }
        }

        for entity in sim.drain_destroyed_ships() {
            if let EntityKind::Ship { player } = &entity.kind {
                snapshot.ships.push(ship(&entity, player));
            }
        }

        snapshot
    }
}

fn ship(entity: &Entity, player: &PlayerId) -> ShipSnapshot {
    ShipSnapshot {
        player: player.clone(),
        entity: entity.id,
        x: entity.position.x,
        y: entity.position.y,
        rotation: entity.rotation,
        vel_x: entity.velocity.x,
        vel_y: entity.velocity.y,
        alive: entity.alive,
    }
}

fn body(entity: &Entity, origin: Option<EntityId>) -> BodySnapshot {
    BodySnapshot {
        entity: entity.id,
        x: entity.position.x,
        y: entity.position.y,
        rotation: entity.rotation,
        vel_x: entity.velocity.x,
        vel_y: entity.velocity.y,
        origin,
    }
}
