//! Firing direction and collision resolution

use glam::Vec2;

use super::entity::{Entity, EntityId};
use super::physics::PhysicsSystem;

/// Collision outcome from one sweep
#[derive(Debug, Clone, PartialEq)]
pub enum Collision {
    /// Both the bullet and the enemy are destroyed
    BulletHitEnemy {
        bullet: EntityId,
        enemy: EntityId,
        position: Vec2,
    },
    /// The ship is destroyed, the enemy survives
    ShipHitEnemy { ship: EntityId, enemy: EntityId },
}

/// Combat system for shots and hits
pub struct CombatSystem;

impl CombatSystem {
    /// Unit direction for a shot.
    ///
    /// Degenerate input vectors (magnitude below `epsilon`, or not finite)
    /// fire along `facing` instead.
    pub fn fire_direction(input: Vec2, facing: f32, epsilon: f32) -> Vec2 {
        let magnitude = input.length();
        if !magnitude.is_finite() || magnitude < epsilon {
            Vec2::new(facing.cos(), facing.sin())
        } else {
            input / magnitude
        }
    }

    /// Mark colliding entities dead and report what happened.
    ///
    /// Bullets are resolved against enemies first; each bullet takes out at
    /// most one enemy, and an enemy killed that way can no longer hit a ship
    /// in the same sweep.
    pub fn resolve(entities: &mut [Entity]) -> Vec<Collision> {
        let mut collisions = Vec::new();

        let enemies = live_indices(entities, Entity::is_enemy);
        let bullets = live_indices(entities, Entity::is_bullet);
        let ships = live_indices(entities, Entity::is_ship);

        for &b in &bullets {
            let hit = enemies
                .iter()
                .copied()
                .find(|&e| entities[e].alive && Self::overlaps(&entities[b], &entities[e]));

            if let Some(e) = hit {
                entities[b].alive = false;
                entities[e].alive = false;
                collisions.push(Collision::BulletHitEnemy {
                    bullet: entities[b].id,
                    enemy: entities[e].id,
                    position: entities[e].position,
                });
            }
        }

        for &s in &ships {
            let hit = enemies
                .iter()
                .copied()
                .find(|&e| entities[e].alive && Self::overlaps(&entities[s], &entities[e]));

            if let Some(e) = hit {
                entities[s].alive = false;
                collisions.push(Collision::ShipHitEnemy {
                    ship: entities[s].id,
                    enemy: entities[e].id,
                });
            }
        }

        collisions
    }

    fn overlaps(a: &Entity, b: &Entity) -> bool {
        PhysicsSystem::check_overlap(a.position, a.radius, b.position, b.radius)
    }
}

fn live_indices(entities: &[Entity], pick: fn(&Entity) -> bool) -> Vec<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive && pick(*e))
        .map(|(i, _)| i)
        .collect()
}
