//! Headless display session - runs the simulation on a fixed frame loop

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, trace};

use crate::util::time::{tick_delta, tick_duration, SIMULATION_TPS, SNAPSHOT_TPS};
use crate::ws::protocol::{EventName, RelayFrame};

use super::simulation::{SimEvent, Simulation};
use super::snapshot::{SnapshotBuilder, WorldSnapshot};
use super::SimConfig;

/// Read side of a display session
#[derive(Clone)]
pub struct DisplayHandle {
    latest: Arc<RwLock<WorldSnapshot>>,
}

impl DisplayHandle {
    /// Most recently published snapshot
    pub fn latest(&self) -> WorldSnapshot {
        self.latest.read().clone()
    }
}

/// A display that subscribes to the relay like any remote display would
pub struct DisplaySession {
    sim: Simulation,
    frames: broadcast::Receiver<RelayFrame>,
    snapshot_builder: SnapshotBuilder,
    latest: Arc<RwLock<WorldSnapshot>>,
}

impl DisplaySession {
    pub fn new(config: SimConfig, frames: broadcast::Receiver<RelayFrame>) -> (Self, DisplayHandle) {
        let latest = Arc::new(RwLock::new(WorldSnapshot {
            width: config.world_width,
            height: config.world_height,
            ..WorldSnapshot::default()
        }));

        let session = Self {
            sim: Simulation::new(config),
            frames,
            snapshot_builder: SnapshotBuilder::new(SIMULATION_TPS / SNAPSHOT_TPS),
            latest: latest.clone(),
        };

        (session, DisplayHandle { latest })
    }

    /// Run the frame loop until the relay goes away
    pub async fn run(mut self) {
        info!("Display session started");

        let mut frame_interval = interval(tick_duration());
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            frame_interval.tick().await;

            if !self.drain_frames() {
                info!("Relay closed, stopping display session");
                break;
            }

            self.advance(tick_delta());
        }
    }

    /// Apply every pending relayed frame. Returns false once the relay is closed.
    fn drain_frames(&mut self) -> bool {
        loop {
            match self.frames.try_recv() {
                Ok(frame) => {
                    if frame.event == EventName::PlayerDisconnected {
                        self.snapshot_builder.force_next();
                    }
                    self.sim.handle_frame(&frame);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Lagged(n)) => {
                    // A skipped departure notice leaves that ship in the world
                    error!(lagged_count = n, "Display lagged, skipped {} relayed frames", n);
                    self.snapshot_builder.force_next();
                }
                Err(TryRecvError::Closed) => return false,
            }
        }
    }

    /// Step the simulation one frame and publish a snapshot when due
    fn advance(&mut self, dt: f32) {
        self.sim.step(dt);

        // New enemies can leave the world on their next step; publish them now
        if self
            .sim
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::EnemySpawned { .. }))
        {
            self.snapshot_builder.force_next();
        }

        if self.snapshot_builder.should_send() {
            let snapshot = self.snapshot_builder.build(&mut self.sim);
            trace!(
                tick = snapshot.tick,
                ships = snapshot.ships.len(),
                enemies = snapshot.enemies.len(),
                bullets = snapshot.bullets.len(),
                "Published snapshot"
            );
            *self.latest.write() = snapshot;
        }
    }
}
