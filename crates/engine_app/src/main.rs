//! # engine_app
//!
//! Demo host for the dispatch layer. Builds a small scene, registers the
//! demo systems with a [`World`](engine_world::World) and drives them from a
//! fixed-timestep tick loop.
//!
//! ## Startup Sequence
//!
//! 1. Load the world configuration (defaults, or `--config <file>`).
//! 2. Register the demo systems and spawn the scene.
//! 3. Enter the tick loop for `--ticks` ticks (0 runs forever).

mod demo;
mod tick;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine_system::{ClientId, Realm};
use engine_world::{EcsConfig, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tick::{TickConfig, TickLoop};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RealmArg {
    Server,
    Client,
    Listen,
}

impl From<RealmArg> for Realm {
    fn from(realm: RealmArg) -> Self {
        match realm {
            RealmArg::Server => Realm::SERVER,
            RealmArg::Client => Realm::CLIENT,
            RealmArg::Listen => Realm::LISTEN,
        }
    }
}

#[derive(Parser)]
#[command(name = "engine_app", about = "Tick-driven system dispatch demo")]
struct Args {
    /// Number of ticks to run (0 = unlimited)
    #[arg(short, long, default_value_t = 120)]
    ticks: u64,

    /// Target ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Which side of the game to run
    #[arg(short, long, value_enum, default_value_t = RealmArg::Listen)]
    realm: RealmArg,

    /// JSON world configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable query caching
    #[arg(long)]
    no_cache: bool,

    /// Connected clients in the scene; the first is the local one
    #[arg(long, default_value_t = 2)]
    clients: u64,

    /// Client frames rendered per tick
    #[arg(long, default_value_t = 2)]
    frames: u32,
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EcsConfig::from_json_file(path)
            .with_context(|| format!("loading world config from {}", path.display()))?,
        None => EcsConfig::default(),
    };
    if args.no_cache {
        config = config.with_caching(false);
    }
    let config = config.with_system_resolver(demo::debug_overlay_resolver);
    info!(?config, "engine starting");

    let dt = 1.0 / args.tick_rate;
    let mut world = World::new(&config);
    demo::register_systems(&mut world, dt as f32)?;

    let tick_config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.ticks,
        realm: args.realm.into(),
        client: ClientId(1),
        frames_per_tick: args.frames,
    };
    let mut tick_loop = TickLoop::new(tick_config, world);
    tick_loop.spawn(demo::spawn_scene(args.clients));
    info!(
        systems = tick_loop.world().system_count(),
        entities = tick_loop.scene().len(),
        "scene ready"
    );

    tick_loop.run()?;

    let world = tick_loop.world();
    if let Some(movement) = demo::system::<demo::MovementSystem>(world) {
        info!(moved = movement.moved(), "movement summary");
    }
    if let Some(input) = demo::system::<demo::PlayerInputSystem>(world) {
        info!(
            predictions = input.predictions(),
            frames = input.frames(),
            "prediction summary"
        );
    }
    if let Some(overlay) = demo::system::<demo::DebugOverlaySystem>(world) {
        info!(
            draws = overlay.draws(),
            visible = overlay.last_visible(),
            "overlay summary"
        );
    }

    info!(ticks = tick_loop.tick_id(), stats = ?tick_loop.stats(), "engine shut down");
    Ok(())
}
