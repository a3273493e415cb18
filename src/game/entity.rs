//! Entity representation shared by ships, bullets and enemies

use glam::Vec2;
use serde::Serialize;

use super::timers::TimerId;

/// Session-unique entity id, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Controller id as carried in relayed payloads
pub type PlayerId = String;

/// What happens when an entity reaches the world edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Held inside the world
    Clamp,
    /// Removed once its centre leaves the world
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Ship {
        player: PlayerId,
    },
    Bullet {
        /// Ship that fired it; informational only
        origin: EntityId,
        /// Failsafe removal timer
        expiry: TimerId,
    },
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing angle in radians
    pub rotation: f32,
    pub radius: f32,
    pub bounds: BoundsPolicy,
    pub alive: bool,
}

impl Entity {
    pub fn ship(id: EntityId, player: PlayerId, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Ship { player },
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius,
            bounds: BoundsPolicy::Clamp,
            alive: true,
        }
    }

    pub fn bullet(
        id: EntityId,
        origin: EntityId,
        expiry: TimerId,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
    ) -> Self {
        Self {
            id,
            kind: EntityKind::Bullet { origin, expiry },
            position,
            velocity,
            rotation: velocity.y.atan2(velocity.x),
            radius,
            bounds: BoundsPolicy::Destroy,
            alive: true,
        }
    }

    pub fn enemy(id: EntityId, position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy,
            position,
            velocity,
            rotation: 0.0,
            radius,
            bounds: BoundsPolicy::Destroy,
            alive: true,
        }
    }

    pub fn is_ship(&self) -> bool {
        matches!(self.kind, EntityKind::Ship { .. })
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet { .. })
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy)
    }

    /// Owning controller, for ships
    pub fn player(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Ship { player } => Some(player),
            _ => None,
        }
    }
}
