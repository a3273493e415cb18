//! Authoritative display simulation state and step

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::ws::protocol::RelayFrame;

use super::combat::{Collision, CombatSystem};
use super::entity::{BoundsPolicy, Entity, EntityId, EntityKind, PlayerId};
use super::input::{decoder_for, InputEvent, Tint};
use super::physics::{PhysicsSystem, WorldBounds};
use super::spawner;
use super::timers::{TimerKind, TimerQueue};
use super::SimConfig;

/// Minimum spacing of the spawn loop, guards against a zero interval
const MIN_SPAWN_INTERVAL: f32 = 0.01;

/// Why a ship was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyCause {
    Enemy,
    Disconnect,
}

/// Why a bullet or enemy was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    Hit,
    OutOfBounds,
    Expired,
}

/// Side effects of simulation operations, drained into snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    ShipSpawned {
        player: PlayerId,
        ship: EntityId,
    },
    PlayerDestroyed {
        player: PlayerId,
        ship: EntityId,
        cause: DestroyCause,
    },
    BulletFired {
        player: PlayerId,
        bullet: EntityId,
        vx: f32,
        vy: f32,
    },
    BulletRemoved {
        bullet: EntityId,
        cause: RemovalCause,
    },
    EnemySpawned {
        enemy: EntityId,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    },
    EnemyRemoved {
        enemy: EntityId,
        cause: RemovalCause,
    },
}

/// One display session's world
pub struct Simulation {
    config: SimConfig,
    bounds: WorldBounds,
    /// Simulation clock in seconds
    clock: f64,
    tick: u64,
    entities: Vec<Entity>,
    /// Controller id -> its ship
    players: HashMap<PlayerId, EntityId>,
    timers: TimerQueue,
    rng: ChaCha8Rng,
    next_entity_id: u64,
    tint: Option<Tint>,
    events: Vec<SimEvent>,
    /// Ships removed since the last snapshot, as they were when destroyed
    destroyed_ships: Vec<Entity>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut timers = TimerQueue::new();
        timers.schedule(spawn_interval(&config), TimerKind::SpawnEnemy);

        Self {
            bounds: WorldBounds::new(config.world_width, config.world_height),
            config,
            clock: 0.0,
            tick: 0,
            entities: Vec::new(),
            players: HashMap::new(),
            timers,
            rng,
            next_entity_id: 1,
            tint: None,
            events: Vec::new(),
            destroyed_ships: Vec::new(),
        }
    }

    /// Apply one relayed frame through the event table
    pub fn handle_frame(&mut self, frame: &RelayFrame) {
        let Some(decode) = decoder_for(frame.event) else {
            debug!(event = %frame.event, "No simulation handler for event");
            return;
        };

        match decode(&frame.data) {
            Ok(event) => self.apply(event),
            Err(e) => debug!(event = %frame.event, error = %e, "Ignoring malformed input"),
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveUpdate { id, dx, dy } => {
                self.apply_move(&id, dx, dy);
            }
            InputEvent::Shoot { id, dx, dy } => {
                self.apply_shoot(&id, dx, dy);
            }
            InputEvent::ColorChange { color } => self.apply_color_change(color),
            InputEvent::Disconnect { id } => {
                self.apply_disconnect(&id);
            }
        }
    }

    /// Set a ship's velocity from stick input, creating the ship on first use
    pub fn apply_move(&mut self, id: &str, dx: f32, dy: f32) -> EntityId {
        let move_factor = self.config.move_factor;
        let ship_id = match self.players.get(id) {
            Some(&ship_id) => ship_id,
            None => self.spawn_ship(id),
        };

        if let Some(ship) = self.entity_mut(ship_id) {
            ship.velocity = Vec2::new(dx, dy) * move_factor;
            if let Some(heading) = PhysicsSystem::heading(ship.velocity) {
                ship.rotation = heading;
            }
        }
        ship_id
    }

    /// Fire a bullet from `id`'s ship. No ship, no bullet.
    pub fn apply_shoot(&mut self, id: &str, dx: f32, dy: f32) -> Option<EntityId> {
        let ship = self.ship(id)?;
        let ship_id = ship.id;
        let origin = ship.position;

        let direction =
            CombatSystem::fire_direction(Vec2::new(dx, dy), ship.rotation, self.config.shoot_epsilon);
        let velocity = direction * self.config.bullet_speed;

        let bullet_id = self.allocate_id();
        let due = self.clock + f64::from(self.config.bullet_lifetime);
        let expiry = self.timers.schedule(due, TimerKind::ExpireBullet(bullet_id));

        self.entities.push(Entity::bullet(
            bullet_id,
            ship_id,
            expiry,
            origin,
            velocity,
            self.config.bullet_radius,
        ));
        self.events.push(SimEvent::BulletFired {
            player: id.to_string(),
            bullet: bullet_id,
            vx: velocity.x,
            vy: velocity.y,
        });
        debug!(player = %id, bullet = bullet_id.0, vx = velocity.x, vy = velocity.y, "Bullet fired");

        Some(bullet_id)
    }

    /// Spawn one enemy on a random border point
    pub fn tick_spawn_enemy(&mut self) -> EntityId {
        let spawn = spawner::border_spawn_point(&mut self.rng, &self.bounds);
        let targets: Vec<Vec2> = self
            .entities
            .iter()
            .filter(|e| e.alive && e.is_ship())
            .map(|e| e.position)
            .collect();
        let velocity = spawner::initial_velocity(
            &mut self.rng,
            spawn,
            targets,
            self.config.enemy_speed,
            self.config.enemy_random_speed,
        );
        self.spawn_enemy_at(spawn, velocity)
    }

    pub fn spawn_enemy_at(&mut self, position: Vec2, velocity: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.entities
            .push(Entity::enemy(id, position, velocity, self.config.enemy_radius));
        self.events.push(SimEvent::EnemySpawned {
            enemy: id,
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
        });
        id
    }

    /// Resolve overlaps and remove whatever they destroyed
    pub fn resolve_collisions(&mut self) {
        for collision in CombatSystem::resolve(&mut self.entities) {
            match collision {
                Collision::BulletHitEnemy {
                    bullet,
                    enemy,
                    position,
                } => {
                    self.events.push(SimEvent::BulletRemoved {
                        bullet,
                        cause: RemovalCause::Hit,
                    });
                    self.events.push(SimEvent::EnemyRemoved {
                        enemy,
                        cause: RemovalCause::Hit,
                    });
                    debug!(
                        bullet = bullet.0,
                        enemy = enemy.0,
                        x = position.x,
                        y = position.y,
                        "Enemy hit by bullet"
                    );
                }
                Collision::ShipHitEnemy { ship, enemy } => {
                    let player = self
                        .entity(ship)
                        .and_then(Entity::player)
                        .map(str::to_string)
                        .unwrap_or_default();
                    self.players.remove(&player);
                    info!(player = %player, enemy = enemy.0, "Player destroyed by enemy");
                    self.events.push(SimEvent::PlayerDestroyed {
                        player,
                        ship,
                        cause: DestroyCause::Enemy,
                    });
                }
            }
        }
        self.sweep();
    }

    /// Remove `id`'s ship, if any
    pub fn apply_disconnect(&mut self, id: &str) -> bool {
        let Some(ship_id) = self.players.remove(id) else {
            return false;
        };
        if let Some(ship) = self.entity_mut(ship_id) {
            ship.alive = false;
        }
        self.sweep();

        info!(player = %id, "Removed disconnected player");
        self.events.push(SimEvent::PlayerDestroyed {
            player: id.to_string(),
            ship: ship_id,
            cause: DestroyCause::Disconnect,
        });
        true
    }

    pub fn apply_color_change(&mut self, color: Tint) {
        debug!(color = %color, "Tint changed");
        self.tint = Some(color);
    }

    /// Advance the world by `dt` seconds.
    ///
    /// Timers fire after bounds enforcement, so an enemy spawned on the
    /// border is still in the world at the end of the step that created it.
    pub fn step(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.tick += 1;
        self.clock += f64::from(dt);

        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            entity.position = PhysicsSystem::integrate(entity.position, entity.velocity, dt);
        }

        self.enforce_bounds();
        self.fire_due_timers();
        self.resolve_collisions();
    }

    fn fire_due_timers(&mut self) {
        while let Some(fired) = self.timers.pop_due(self.clock) {
            match fired.kind {
                TimerKind::SpawnEnemy => {
                    self.tick_spawn_enemy();
                    let next = fired.due + spawn_interval(&self.config);
                    self.timers.schedule(next, TimerKind::SpawnEnemy);
                }
                TimerKind::ExpireBullet(bullet) => {
                    // Bullets removed earlier cancel their timer; this is a fallback
                    let Some(entity) = self.entity_mut(bullet).filter(|e| e.alive) else {
                        continue;
                    };
                    entity.alive = false;
                    self.events.push(SimEvent::BulletRemoved {
                        bullet,
                        cause: RemovalCause::Expired,
                    });
                }
            }
        }
    }

    fn enforce_bounds(&mut self) {
        let bounds = self.bounds;
        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            match entity.bounds {
                BoundsPolicy::Clamp => {
                    entity.position = bounds.clamp(entity.position, entity.radius);
                }
                BoundsPolicy::Destroy => {
                    if bounds.contains(entity.position) {
                        continue;
                    }
                    entity.alive = false;
                    let cause = RemovalCause::OutOfBounds;
                    self.events.push(match entity.kind {
                        EntityKind::Bullet { .. } => SimEvent::BulletRemoved {
                            bullet: entity.id,
                            cause,
                        },
                        _ => SimEvent::EnemyRemoved {
                            enemy: entity.id,
                            cause,
                        },
                    });
                }
            }
        }
    }

    /// Drop dead entities and cancel the timers they own
    fn sweep(&mut self) {
        let timers = &mut self.timers;
        let destroyed_ships = &mut self.destroyed_ships;
        self.entities.retain(|e| {
            if e.alive {
                return true;
            }
            match e.kind {
                EntityKind::Bullet { expiry, .. } => {
                    timers.cancel(expiry);
                }
                EntityKind::Ship { .. } => destroyed_ships.push(e.clone()),
                EntityKind::Enemy => {}
            }
            false
        });
    }

    fn spawn_ship(&mut self, id: &str) -> EntityId {
        let ship_id = self.allocate_id();
        self.entities.push(Entity::ship(
            ship_id,
            id.to_string(),
            self.bounds.center(),
            self.config.ship_radius,
        ));
        self.players.insert(id.to_string(), ship_id);
        self.events.push(SimEvent::ShipSpawned {
            player: id.to_string(),
            ship: ship_id,
        });
        info!(player = %id, ship = ship_id.0, "Ship spawned");
        ship_id
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// `id`'s current ship
    pub fn ship(&self, id: &str) -> Option<&Entity> {
        self.players.get(id).and_then(|&ship| self.entity(ship))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn tint(&self) -> Option<Tint> {
        self.tint
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation clock in seconds
    pub fn time(&self) -> f64 {
        self.clock
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Events not yet drained into a snapshot
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_destroyed_ships(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.destroyed_ships)
    }
}

fn spawn_interval(config: &SimConfig) -> f64 {
    f64::from(config.spawn_interval.max(MIN_SPAWN_INTERVAL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::protocol::EventName;
    use serde_json::json;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> Simulation {
        Simulation::new(SimConfig {
            seed: Some(42),
            // Keep the spawn loop out of the way unless a test wants it
            spawn_interval: 1_000.0,
            ..SimConfig::default()
        })
    }

    fn count(sim: &Simulation, pick: fn(&Entity) -> bool) -> usize {
        sim.entities().iter().filter(|e| pick(*e)).count()
    }

    fn run_for(sim: &mut Simulation, seconds: f32) {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            sim.step(DT);
        }
    }

    #[test]
    fn repeated_moves_create_one_ship() {
        let mut sim = sim();
        let first = sim.apply_move("a", 0.5, 0.0);
        for _ in 0..10 {
            assert_eq!(sim.apply_move("a", 0.5, 0.0), first);
        }
        assert_eq!(count(&sim, Entity::is_ship), 1);

        let ship = sim.ship("a").unwrap();
        assert_eq!(ship.velocity, Vec2::new(125.0, 0.0));
    }

    #[test]
    fn ship_spawns_at_world_center() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        assert_eq!(sim.ship("a").unwrap().position, sim.bounds().center());
    }

    #[test]
    fn two_controllers_scenario() {
        let mut sim = sim();
        sim.apply_move("idA", 1.0, 0.0);
        sim.apply_move("idB", 0.0, -1.0);

        let a = sim.ship("idA").unwrap();
        assert_eq!(a.velocity, Vec2::new(250.0, 0.0));
        assert_eq!(a.rotation, 0.0);

        let b = sim.ship("idB").unwrap();
        assert_eq!(b.velocity, Vec2::new(0.0, -250.0));
        assert!((b.rotation + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn zero_input_keeps_facing() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 1.0);
        sim.apply_move("a", 0.0, 0.0);
        let ship = sim.ship("a").unwrap();
        assert_eq!(ship.velocity, Vec2::ZERO);
        assert!((ship.rotation - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn degenerate_shot_fires_along_facing() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 1.0);
        let bullet = sim.apply_shoot("a", 0.0, 0.0).unwrap();

        let bullet = sim.entity(bullet).unwrap();
        assert!(bullet.velocity.x.abs() < 1e-3);
        assert!((bullet.velocity.y - 400.0).abs() < 1e-3);
        assert_eq!(bullet.position, sim.ship("a").unwrap().position);
    }

    #[test]
    fn shot_velocity_is_normalized_times_speed() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        let bullet = sim.apply_shoot("a", 0.3, -0.4).unwrap();
        let v = sim.entity(bullet).unwrap().velocity;
        assert!((v.x - 240.0).abs() < 1e-3);
        assert!((v.y + 320.0).abs() < 1e-3);
    }

    #[test]
    fn shoot_without_ship_is_noop() {
        let mut sim = sim();
        assert!(sim.apply_shoot("ghost", 1.0, 0.0).is_none());
        assert_eq!(sim.entities().len(), 0);
    }

    #[test]
    fn bullet_expires_without_collision_or_exit() {
        let mut config = SimConfig {
            seed: Some(1),
            spawn_interval: 1_000.0,
            // Slow enough to stay on screen for the whole lifetime
            bullet_speed: 10.0,
            ..SimConfig::default()
        };
        config.bullet_lifetime = 10.0;
        let mut sim = Simulation::new(config);

        sim.apply_move("a", 0.0, 0.0);
        let bullet = sim.apply_shoot("a", 1.0, 0.0).unwrap();
        assert_eq!(sim.pending_timers(), 2);

        run_for(&mut sim, 9.9);
        assert!(sim.entity(bullet).is_some());

        run_for(&mut sim, 0.1);
        sim.step(DT);
        assert!(sim.entity(bullet).is_none());
        assert_eq!(sim.pending_timers(), 1);

        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::BulletRemoved {
            bullet,
            cause: RemovalCause::Expired
        }));
    }

    #[test]
    fn bullet_leaving_world_is_removed_and_timer_cancelled() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        let bullet = sim.apply_shoot("a", 1.0, 0.0).unwrap();

        // 640 units to the right edge at 400 units/s
        run_for(&mut sim, 2.0);

        assert!(sim.entity(bullet).is_none());
        assert_eq!(sim.pending_timers(), 1);
        assert!(sim.drain_events().contains(&SimEvent::BulletRemoved {
            bullet,
            cause: RemovalCause::OutOfBounds
        }));
    }

    #[test]
    fn enemy_overlap_destroys_ship_not_enemy() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        let center = sim.bounds().center();
        let enemy = sim.spawn_enemy_at(center + Vec2::new(10.0, 0.0), Vec2::ZERO);

        sim.step(DT);

        assert!(sim.ship("a").is_none());
        assert!(sim.entity(enemy).is_some());
        assert!(sim.drain_events().iter().any(|e| matches!(
            e,
            SimEvent::PlayerDestroyed { cause: DestroyCause::Enemy, .. }
        )));

        // The ship is gone; shooting does nothing until the next move
        assert!(sim.apply_shoot("a", 1.0, 0.0).is_none());
    }

    #[test]
    fn bullet_hit_destroys_both() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        let center = sim.bounds().center();
        let enemy = sim.spawn_enemy_at(center + Vec2::new(100.0, 0.0), Vec2::ZERO);
        let bullet = sim.apply_shoot("a", 1.0, 0.0).unwrap();

        run_for(&mut sim, 0.3);

        assert!(sim.entity(enemy).is_none());
        assert!(sim.entity(bullet).is_none());
        assert!(sim.ship("a").is_some());
        assert_eq!(sim.pending_timers(), 1);
    }

    #[test]
    fn disconnect_removes_ship_until_next_move() {
        let mut sim = sim();
        let old = sim.apply_move("a", 1.0, 0.0);

        assert!(sim.apply_disconnect("a"));
        assert!(sim.ship("a").is_none());
        assert!(sim.apply_shoot("a", 1.0, 0.0).is_none());
        assert!(!sim.apply_disconnect("a"));

        let new = sim.apply_move("a", 0.0, 1.0);
        assert_ne!(old, new);
        assert_eq!(count(&sim, Entity::is_ship), 1);
    }

    #[test]
    fn enemy_without_players_gets_bounded_random_velocity() {
        let mut sim = sim();
        let enemy = sim.tick_spawn_enemy();
        let enemy = sim.entity(enemy).unwrap();
        assert!(enemy.alive);
        assert!((-100.0..=100.0).contains(&enemy.velocity.x));
        assert!((-100.0..=100.0).contains(&enemy.velocity.y));
        assert!(sim.bounds().contains(enemy.position));
    }

    #[test]
    fn enemy_targets_nearest_ship_once() {
        let mut sim = sim();
        sim.apply_move("a", 0.0, 0.0);
        let enemy = sim.tick_spawn_enemy();
        let (spawn, velocity) = {
            let e = sim.entity(enemy).unwrap();
            (e.position, e.velocity)
        };

        let expected = (sim.bounds().center() - spawn).normalize() * 100.0;
        assert!((velocity - expected).length() < 1e-2);

        // Moving the ship does not re-target the enemy
        sim.apply_move("a", 1.0, 1.0);
        sim.step(DT);
        assert_eq!(sim.entity(enemy).map(|e| e.velocity), Some(velocity));
    }

    #[test]
    fn spawn_timer_repeats() {
        let mut sim = Simulation::new(SimConfig {
            seed: Some(9),
            spawn_interval: 2.0,
            ..SimConfig::default()
        });

        run_for(&mut sim, 1.9);
        assert_eq!(count(&sim, Entity::is_enemy), 0);

        run_for(&mut sim, 4.2);
        let spawned = sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }

    #[test]
    fn spawned_enemies_survive_their_spawn_step() {
        let mut sim = Simulation::new(SimConfig {
            seed: Some(42),
            spawn_interval: 0.5,
            ..SimConfig::default()
        });

        let mut spawned = 0;
        for _ in 0..6_000 {
            sim.step(DT);
            let events = sim.drain_events();
            for event in &events {
                let SimEvent::EnemySpawned { enemy, .. } = event else {
                    continue;
                };
                spawned += 1;
                assert!(sim.entity(*enemy).is_some());
                assert!(!events.iter().any(|e| matches!(
                    e,
                    SimEvent::EnemyRemoved { enemy: removed, .. } if removed == enemy
                )));
            }
        }
        assert_eq!(spawned, 200);
    }

    #[test]
    fn negative_dt_does_not_move_or_rewind() {
        let mut sim = sim();
        sim.apply_move("a", 1.0, 1.0);
        let start = sim.ship("a").unwrap().position;

        sim.step(-1.0);
        sim.step(f32::NAN);

        assert_eq!(sim.ship("a").unwrap().position, start);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.tick(), 2);
    }

    #[test]
    fn destroyed_ships_are_kept_until_drained() {
        let mut sim = sim();
        let ship = sim.apply_move("a", 0.0, 0.0);
        sim.apply_disconnect("a");

        let destroyed = sim.drain_destroyed_ships();
        assert_eq!(destroyed.len(), 1);
        assert_eq!(destroyed[0].id, ship);
        assert!(!destroyed[0].alive);
        assert!(sim.drain_destroyed_ships().is_empty());
    }

    #[test]
    fn ships_are_clamped_to_world() {
        let mut sim = sim();
        sim.apply_move("a", -1.0, -1.0);
        run_for(&mut sim, 5.0);
        let ship = sim.ship("a").unwrap();
        assert_eq!(ship.position, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn entity_ids_are_not_reused() {
        let mut sim = sim();
        let a = sim.apply_move("a", 0.0, 0.0);
        sim.apply_disconnect("a");
        let b = sim.apply_move("b", 0.0, 0.0);
        let enemy = sim.tick_spawn_enemy();
        assert!(a < b && b < enemy);
    }

    #[test]
    fn frames_route_through_event_table() {
        let mut sim = sim();
        sim.handle_frame(&RelayFrame::new(
            EventName::LauncherUpdate,
            json!({"id": "a", "dx": 1, "dy": 0}),
        ));
        sim.handle_frame(&RelayFrame::new(EventName::ChangeColor, json!("#00ff00")));
        sim.handle_frame(&RelayFrame::new(EventName::Launch, json!({"dx": 1, "dy": 1})));
        sim.handle_frame(&RelayFrame::new(EventName::Shoot, json!({"dx": 1})));

        assert_eq!(count(&sim, Entity::is_ship), 1);
        assert_eq!(count(&sim, Entity::is_bullet), 0);
        assert_eq!(sim.tint().map(|t| t.to_string()), Some("#00ff00".to_string()));

        sim.handle_frame(&RelayFrame::new(EventName::PlayerDisconnected, json!("a")));
        assert_eq!(count(&sim, Entity::is_ship), 0);
    }
}
