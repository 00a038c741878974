//! Demo scene and systems driven by the tick loop.
//!
//! - [`MovementSystem`] integrates velocities on the server.
//! - [`PlayerInputSystem`] predicts each client's own pawn.
//! - [`DebugOverlaySystem`] has no built-in capability and is run by
//!   [`debug_overlay_resolver`] through the world's fallback hook.

use std::rc::Rc;

use engine_component::{EntityExt, EntityId, EntityIterExt, EntityRecord};
use engine_defaults::{
    Client, HasPosition, HasRotation, Model, Position, Quat, Transform, Vec3, Vec4, Velocity,
};
use engine_query::{Output, Query};
use engine_system::{ClientId, RealmAffinity, SimulateSystem, System, TickSystem};
use engine_world::{Unhandled, World, WorldError};
use tracing::{debug, trace};

/// Entities as the demo host stores them.
pub type Pawn = Rc<EntityRecord>;

/// Speed a predicted player pawn moves at, in units per second.
pub const PLAYER_SPEED: f32 = 4.0;

/// Build the demo scene: one pawn per client, drifting props and static
/// scenery.
#[must_use]
pub fn spawn_scene(clients: u64) -> Vec<Pawn> {
    let mut next = 0;
    let mut id = || {
        next += 1;
        EntityId(next)
    };

    let mut scene = Vec::new();
    for client in 1..=clients {
        scene.push(Rc::new(
            EntityRecord::new(id())
                .with(Transform::from_position(Vec3::new(client as f32 * 2.0, 0.0, 0.0)))
                .with(Velocity::default())
                .with(Client::new(ClientId(client)))
                .with(Model::new("models/citizen.vmdl"))
                .with_tags("player"),
        ));
    }
    for i in 0..3 {
        scene.push(Rc::new(
            EntityRecord::new(id())
                .with(Position::new(Vec3::new(0.0, i as f32, 5.0)))
                .with(Velocity::new(Vec3::Y * 0.5))
                .with(
                    Model::new("models/crate.vmdl").with_color(Vec4::new(0.8, 0.5, 0.2, 1.0)),
                )
                .with_tags("prop"),
        ));
    }
    scene.push(Rc::new(
        EntityRecord::new(id())
            .with(Position::new(Vec3::new(0.0, 0.0, -10.0)))
            .with(Velocity::new(Vec3::X))
            .with_tags("prop frozen"),
    ));
    scene
}

/// Register every demo system with `world`.
///
/// # Errors
///
/// Returns [`WorldError::DuplicateSystem`] if the demo systems were already
/// registered.
pub fn register_systems(world: &mut World, dt: f32) -> Result<(), WorldError> {
    world.add_system::<Pawn, _>(MovementSystem::new(dt))?;
    world.add_system::<Pawn, _>(PlayerInputSystem::new(dt))?;
    world.add_default_system::<Pawn, DebugOverlaySystem>()?;
    Ok(())
}

/// Looks up the registered demo system of type `S`.
#[must_use]
pub fn system<S: 'static>(world: &World) -> Option<&S> {
    let id = world.systems().find::<S>()?;
    world.systems().system::<Pawn>(id)?.as_any().downcast_ref::<S>()
}

/// Moves everything with a velocity that is not frozen.
#[derive(Debug)]
pub struct MovementSystem {
    dt: f32,
    moved: u64,
}

impl MovementSystem {
    #[must_use]
    pub fn new(dt: f32) -> Self {
        Self { dt, moved: 0 }
    }

    /// Total entity moves performed.
    #[must_use]
    pub fn moved(&self) -> u64 {
        self.moved
    }
}

impl System<Pawn> for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn supports_caching(&self) -> bool {
        true
    }

    fn filter_entities(&self, query: &mut Query<Pawn>) {
        query.with_component::<Velocity>().without_tag("frozen");
    }

    fn affinity(&self) -> RealmAffinity {
        RealmAffinity::ServerOnly
    }

    fn as_tick(&mut self) -> Option<&mut dyn TickSystem<Pawn>> {
        Some(self)
    }
}

impl TickSystem<Pawn> for MovementSystem {
    fn tick(&mut self, entities: Output<'_, Pawn>) {
        for pawn in entities {
            let Some(velocity) = pawn.component::<Velocity>() else {
                continue;
            };
            let offset = velocity.displacement(self.dt);
            if let Some(transform) = pawn.component::<Transform>() {
                transform.translate(offset);
            } else if let Some(position) = pawn.component::<Position>() {
                position.translate(offset);
            } else {
                continue;
            }
            self.moved += 1;
        }
    }
}

/// Predicts a client's own pawn.
///
/// `simulate` pushes the pawn forward at [`PLAYER_SPEED`]; `frame_simulate`
/// only turns it to face the direction of travel.
#[derive(Debug)]
pub struct PlayerInputSystem {
    dt: f32,
    predictions: u64,
    frames: u64,
}

impl PlayerInputSystem {
    #[must_use]
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            predictions: 0,
            frames: 0,
        }
    }

    #[must_use]
    pub fn predictions(&self) -> u64 {
        self.predictions
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn owned_by(entities: Output<'_, Pawn>, client: ClientId) -> Option<&Pawn> {
    entities
        .with_component::<Client>()
        .find(|pawn| pawn.component::<Client>().is_some_and(|c| c.is_owned_by(client)))
}

impl System<Pawn> for PlayerInputSystem {
    fn name(&self) -> &'static str {
        "player_input"
    }

    fn supports_caching(&self) -> bool {
        true
    }

    fn filter_entities(&self, query: &mut Query<Pawn>) {
        query.with_tag("player").with_component::<Transform>();
    }

    fn affinity(&self) -> RealmAffinity {
        RealmAffinity::ClientOnly
    }

    fn as_simulate(&mut self) -> Option<&mut dyn SimulateSystem<Pawn>> {
        Some(self)
    }
}

impl SimulateSystem<Pawn> for PlayerInputSystem {
    fn simulate(&mut self, entities: Output<'_, Pawn>, client: ClientId) {
        let Some(pawn) = owned_by(entities, client) else {
            debug!(%client, "client has no pawn");
            return;
        };
        if let Some(transform) = pawn.component::<Transform>() {
            transform.translate(Vec3::Z * PLAYER_SPEED * self.dt);
            self.predictions += 1;
        }
    }

    fn frame_simulate(&mut self, entities: Output<'_, Pawn>, client: ClientId) {
        let Some((transform, velocity)) = owned_by(entities, client)
            .and_then(|pawn| pawn.components2::<Transform, Velocity>())
        else {
            return;
        };
        let heading = velocity.linear().normalize_or_zero();
        if heading != Vec3::ZERO {
            transform.set_rotation(Quat::from_rotation_arc(Vec3::Z, heading));
        }
        self.frames += 1;
    }
}

/// Counts visible models. Has no execution capability of its own.
#[derive(Debug, Default)]
pub struct DebugOverlaySystem {
    draws: u64,
    last_visible: usize,
}

impl DebugOverlaySystem {
    /// Record one overlay pass over `models`.
    pub fn draw<'a>(&mut self, models: impl Iterator<Item = &'a Pawn>) {
        self.last_visible = models.inspect(|pawn| trace!(entity = %pawn.id(), "overlay")).count();
        self.draws += 1;
    }

    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    #[must_use]
    pub fn last_visible(&self) -> usize {
        self.last_visible
    }
}

impl System<Pawn> for DebugOverlaySystem {
    fn name(&self) -> &'static str {
        "debug_overlay"
    }

    fn supports_caching(&self) -> bool {
        false
    }

    fn filter_entities(&self, query: &mut Query<Pawn>) {
        query.with_component::<Model>();
    }
}

/// Fallback resolver that runs [`DebugOverlaySystem`].
pub fn debug_overlay_resolver(unhandled: &mut Unhandled<'_>) -> bool {
    let Some(query) = unhandled.query::<Pawn>() else {
        return false;
    };
    let Some(overlay) = unhandled.system_mut::<DebugOverlaySystem>() else {
        return false;
    };
    overlay.draw(query.output());
    true
}

#[cfg(test)]
mod tests {
    use engine_system::{Arg, Realm};
    use engine_world::EcsConfig;

    use super::*;

    fn world() -> World {
        let config = EcsConfig::default().with_system_resolver(debug_overlay_resolver);
        let mut world = World::new(&config);
        register_systems(&mut world, 0.5).unwrap();
        world
    }

    #[test]
    fn test_scene_layout() {
        let scene = spawn_scene(2);
        assert_eq!(scene.len(), 6);
        assert_eq!(scene.iter().with_tags(&["player"]).count(), 2);
        assert_eq!(scene.iter().with_tags(&["prop"]).count(), 4);
    }

    #[test]
    fn test_movement_skips_frozen() {
        let mut world = world();
        let scene = spawn_scene(1);
        world.run_only::<MovementSystem, Pawn>(Realm::SERVER, &scene, &[]).unwrap();

        // The player has zero velocity but is still visited.
        assert_eq!(system::<MovementSystem>(&world).unwrap().moved(), 4);
        let frozen = scene.last().unwrap().component::<Position>().unwrap();
        assert_eq!(frozen.position(), Vec3::new(0.0, 0.0, -10.0));
        let prop = scene[1].component::<Position>().unwrap();
        assert_eq!(prop.position(), Vec3::new(0.0, 0.25, 5.0));
    }

    #[test]
    fn test_prediction_moves_only_own_pawn() {
        let mut world = world();
        let scene = spawn_scene(2);
        let args = [Arg::Client(ClientId(2))];
        world.run_only::<PlayerInputSystem, Pawn>(Realm::CLIENT, &scene, &args).unwrap();

        let first = scene[0].component::<Transform>().unwrap();
        let second = scene[1].component::<Transform>().unwrap();
        assert_eq!(first.position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(second.position(), Vec3::new(4.0, 0.0, PLAYER_SPEED * 0.5));
        assert_eq!(system::<PlayerInputSystem>(&world).unwrap().predictions(), 1);
    }

    #[test]
    fn test_frame_prediction_turns_pawn() {
        let mut world = world();
        let scene = spawn_scene(1);
        scene[0].component::<Velocity>().unwrap().set_linear(Vec3::X);

        let args = [Arg::Client(ClientId(1)), Arg::Flag(true)];
        world.run_only::<PlayerInputSystem, Pawn>(Realm::CLIENT, &scene, &args).unwrap();

        let transform = scene[0].component::<Transform>().unwrap();
        assert!((transform.rotation() * Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(transform.position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(system::<PlayerInputSystem>(&world).unwrap().frames(), 1);
    }

    #[test]
    fn test_overlay_runs_through_fallback() {
        let mut world = world();
        let scene = spawn_scene(1);
        let report = world
            .run_all(Realm::LISTEN, &scene, &[Arg::Client(ClientId(1))])
            .unwrap();

        assert_eq!(report.executed.len(), 2);
        assert_eq!(report.fallback.len(), 1);
        assert!(report.unhandled.is_empty());

        let overlay = system::<DebugOverlaySystem>(&world).unwrap();
        assert_eq!(overlay.draws(), 1);
        assert_eq!(overlay.last_visible(), 4);
    }

    #[test]
    fn test_overlay_unhandled_without_resolver() {
        let mut world = World::default();
        register_systems(&mut world, 0.5).unwrap();
        let scene = spawn_scene(1);
        let report = world.run_all(Realm::SERVER, &scene, &[]).unwrap();
        assert_eq!(report.unhandled.len(), 1);
        assert_eq!(report.skipped.len(), 1);
    }
}
