//! Execution-method resolution.
//!
//! A system's capability is resolved once, when it is registered, into an
//! [`ExecutionMethod`]. Dispatch then calls [`execute`] with that method
//! instead of probing the system's capabilities every tick.
//!
//! Resolution order:
//!
//! 1. [`SimulateSystem`](crate::SimulateSystem): needs a client argument.
//! 2. [`TickSystem`](crate::TickSystem).
//! 3. Otherwise unresolved: [`execute`] reports "not handled".

use engine_query::Output;
use tracing::trace;

use crate::args::Arg;
use crate::error::ExecuteError;
use crate::realm::Realm;
use crate::system::System;

/// The capability a system is executed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMethod {
    /// `simulate` / `frame_simulate`.
    Simulate,
    /// `tick`.
    Tick,
    /// No built-in capability; left to the fallback resolver.
    Unresolved,
}

impl ExecutionMethod {
    /// Resolves the capability `system` exposes.
    #[must_use]
    pub fn resolve<E: 'static>(system: &mut dyn System<E>) -> Self {
        if system.as_simulate().is_some() {
            Self::Simulate
        } else if system.as_tick().is_some() {
            Self::Tick
        } else {
            Self::Unresolved
        }
    }
}

/// Executes `system` through `method`.
///
/// Returns `Ok(true)` if the system was executed and `Ok(false)` if no
/// capability handled it.
///
/// # Errors
///
/// Returns [`ExecuteError::MissingActor`] or [`ExecuteError::InvalidActor`]
/// if a simulate system is dispatched without a client as its first argument.
pub fn execute<E: 'static>(
    system: &mut dyn System<E>,
    method: ExecutionMethod,
    entities: Output<'_, E>,
    args: &[Arg],
    realm: Realm,
) -> Result<bool, ExecuteError> {
    let name = system.name();
    match method {
        ExecutionMethod::Simulate => {
            let client = match args.first() {
                None => return Err(ExecuteError::MissingActor { system: name }),
                Some(arg) => arg.as_client().ok_or(ExecuteError::InvalidActor {
                    system: name,
                    found: arg.kind(),
                })?,
            };
            let frame = realm.is_client() && args.get(1).and_then(Arg::as_flag).unwrap_or(false);
            let Some(simulate) = system.as_simulate() else {
                return Ok(false);
            };
            trace!(system = name, %client, frame, "simulating");
            if frame {
                simulate.frame_simulate(entities, client);
            } else {
                simulate.simulate(entities, client);
            }
            Ok(true)
        }
        ExecutionMethod::Tick => {
            let Some(tick) = system.as_tick() else {
                return Ok(false);
            };
            trace!(system = name, entities = entities.len(), "ticking");
            tick.tick(entities);
            Ok(true)
        }
        ExecutionMethod::Unresolved => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{EntityId, EntityRecord};
    use engine_query::Query;

    use super::*;
    use crate::args::ClientId;
    use crate::system::{SimulateSystem, TickSystem};

    #[derive(Default)]
    struct Ticker {
        seen: Vec<usize>,
    }

    impl System<EntityRecord> for Ticker {
        fn supports_caching(&self) -> bool {
            true
        }

        fn filter_entities(&self, _query: &mut Query<EntityRecord>) {}

        fn as_tick(&mut self) -> Option<&mut dyn TickSystem<EntityRecord>> {
            Some(self)
        }
    }

    impl TickSystem<EntityRecord> for Ticker {
        fn tick(&mut self, entities: Output<'_, EntityRecord>) {
            self.seen.push(entities.len());
        }
    }

    #[derive(Default)]
    struct Predictor {
        simulated: Vec<ClientId>,
        frames: Vec<ClientId>,
    }

    impl System<EntityRecord> for Predictor {
        fn supports_caching(&self) -> bool {
            true
        }

        fn filter_entities(&self, _query: &mut Query<EntityRecord>) {}

        fn as_tick(&mut self) -> Option<&mut dyn TickSystem<EntityRecord>> {
            Some(self)
        }

        fn as_simulate(&mut self) -> Option<&mut dyn SimulateSystem<EntityRecord>> {
            Some(self)
        }
    }

    impl TickSystem<EntityRecord> for Predictor {
        fn tick(&mut self, _entities: Output<'_, EntityRecord>) {
            panic!("simulate takes precedence over tick");
        }
    }

    impl SimulateSystem<EntityRecord> for Predictor {
        fn simulate(&mut self, _entities: Output<'_, EntityRecord>, client: ClientId) {
            self.simulated.push(client);
        }

        fn frame_simulate(&mut self, _entities: Output<'_, EntityRecord>, client: ClientId) {
            self.frames.push(client);
        }
    }

    struct Inert;

    impl System<EntityRecord> for Inert {
        fn supports_caching(&self) -> bool {
            false
        }

        fn filter_entities(&self, _query: &mut Query<EntityRecord>) {}
    }

    fn query() -> Query<EntityRecord> {
        Query::from_entities(vec![
            EntityRecord::new(EntityId(1)),
            EntityRecord::new(EntityId(2)),
        ])
    }

    #[test]
    fn test_resolve_order() {
        assert_eq!(
            ExecutionMethod::resolve::<EntityRecord>(&mut Ticker::default()),
            ExecutionMethod::Tick
        );
        assert_eq!(
            ExecutionMethod::resolve::<EntityRecord>(&mut Predictor::default()),
            ExecutionMethod::Simulate
        );
        assert_eq!(
            ExecutionMethod::resolve::<EntityRecord>(&mut Inert),
            ExecutionMethod::Unresolved
        );
    }

    #[test]
    fn test_tick_executes() {
        let mut system = Ticker::default();
        let q = query();
        let handled = execute::<EntityRecord>(
            &mut system,
            ExecutionMethod::Tick,
            q.output(),
            &[],
            Realm::SERVER,
        )
        .unwrap();
        assert!(handled);
        assert_eq!(system.seen, vec![2]);
    }

    #[test]
    fn test_simulate_requires_actor() {
        let mut system = Predictor::default();
        let q = query();
        let err = execute::<EntityRecord>(
            &mut system,
            ExecutionMethod::Simulate,
            q.output(),
            &[],
            Realm::CLIENT,
        )
        .unwrap_err();
        assert!(matches!(err, ExecuteError::MissingActor { .. }));

        let err = execute::<EntityRecord>(
            &mut system,
            ExecutionMethod::Simulate,
            q.output(),
            &[Arg::Flag(true)],
            Realm::CLIENT,
        )
        .unwrap_err();
        assert!(matches!(err, ExecuteError::InvalidActor { found: "flag", .. }));
        assert!(system.simulated.is_empty());
    }

    #[test]
    fn test_frame_simulate_only_on_client() {
        let mut system = Predictor::default();
        let q = query();
        let args = [Arg::Client(ClientId(7)), Arg::Flag(true)];

        for realm in [Realm::CLIENT, Realm::SERVER] {
            execute::<EntityRecord>(
                &mut system,
                ExecutionMethod::Simulate,
                q.output(),
                &args,
                realm,
            )
            .unwrap();
        }
        execute::<EntityRecord>(
            &mut system,
            ExecutionMethod::Simulate,
            q.output(),
            &[Arg::Client(ClientId(8))],
            Realm::CLIENT,
        )
        .unwrap();

        assert_eq!(system.frames, vec![ClientId(7)]);
        assert_eq!(system.simulated, vec![ClientId(7), ClientId(8)]);
    }

    #[test]
    fn test_unresolved_is_not_handled() {
        let q = query();
        let handled = execute::<EntityRecord>(
            &mut Inert,
            ExecutionMethod::Unresolved,
            q.output(),
            &[],
            Realm::SERVER,
        )
        .unwrap();
        assert!(!handled);
    }
}
