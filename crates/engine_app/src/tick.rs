//! Fixed-timestep tick loop.
//!
//! Each tick:
//!
//! 1. Dispatch every system over the scene with the local client as actor.
//!    Tick systems run on the server, simulate systems on the client and
//!    anything else goes through the fallback resolver.
//! 2. On the client, dispatch simulate systems once more per rendered frame
//!    with the per-frame flag set.
//! 3. Advance the tick counter.

use std::time::{Duration, Instant};

use engine_query::{CollectionId, EntitySource};
use engine_system::{Arg, ClientId, Realm};
use engine_world::{DispatchReport, SystemSelector, World, WorldError};
use tracing::{debug, info, warn};

use crate::demo::Pawn;

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Which side of the game this process runs.
    pub realm: Realm,
    /// The local client, passed to simulate systems.
    pub client: ClientId,
    /// Client frames rendered per tick.
    pub frames_per_tick: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            realm: Realm::LISTEN,
            client: ClientId(1),
            frames_per_tick: 1,
        }
    }
}

/// Totals across every dispatch the loop has made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub executed: u64,
    pub fallback: u64,
    pub skipped: u64,
    pub unhandled: u64,
}

impl TickStats {
    fn record(&mut self, report: &DispatchReport) {
        self.executed += report.executed.len() as u64;
        self.fallback += report.fallback.len() as u64;
        self.skipped += report.skipped.len() as u64;
        self.unhandled += report.unhandled.len() as u64;
    }
}

/// The tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    config: TickConfig,
    world: World,
    /// Host-owned entities dispatched every tick.
    scene: Vec<Pawn>,
    scene_id: CollectionId,
    stats: TickStats,
}

impl TickLoop {
    /// Create a new tick loop around `world` with an empty scene.
    #[must_use]
    pub fn new(config: TickConfig, mut world: World) -> Self {
        let scene_id = world.register_collection();
        Self {
            tick_id: 0,
            config,
            world,
            scene: Vec::new(),
            scene_id,
            stats: TickStats::default(),
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &[Pawn] {
        &self.scene
    }

    /// Returns the dispatch totals so far.
    #[must_use]
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Add entities to the scene.
    ///
    /// Cached queries over the scene are dropped so the next tick sees the
    /// new entities.
    pub fn spawn(&mut self, pawns: impl IntoIterator<Item = Pawn>) {
        let before = self.scene.len();
        self.scene.extend(pawns);
        self.world.cache_mut().invalidate_for_collection(self.scene_id);
        debug!(
            spawned = self.scene.len() - before,
            total = self.scene.len(),
            "scene changed"
        );
    }

    /// Run one tick of the simulation.
    ///
    /// # Errors
    ///
    /// Returns the first dispatch error; see [`World::run`].
    pub fn tick(&mut self, dt: f64) -> Result<(), WorldError> {
        self.tick_id += 1;
        let realm = self.config.realm;
        let actor = Arg::Client(self.config.client);
        let source = EntitySource::from(&self.scene).in_collection(self.scene_id);

        debug!(tick_id = self.tick_id, dt, entities = self.scene.len(), "tick start");

        let report = self
            .world
            .run(SystemSelector::All, realm, source, &[actor.clone()])?;
        self.stats.record(&report);

        if realm.is_client() {
            let frame_args = [actor, Arg::Flag(true)];
            for _ in 0..self.config.frames_per_tick {
                let report = self
                    .world
                    .run(SystemSelector::Simulate, realm, source, &frame_args)?;
                self.stats.record(&report);
            }
        }
        Ok(())
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// # Errors
    ///
    /// Stops at the first tick that fails.
    pub fn run(&mut self) -> Result<(), WorldError> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realm = ?self.config.realm,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let dt = tick_duration.as_secs_f64();
            self.tick(dt)?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, stats = ?self.stats, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}
