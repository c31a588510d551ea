use crate::World;

/// A unit of simulation logic driven through three phases.
///
/// 1. `initialize` - one-off setup, e.g. building groups or spawning entities
/// 2. `execute` - called once per simulation step
/// 3. `teardown` - one-off cleanup before the world is cleared or dropped
///
/// Every phase has a no-op default, so a system only implements what it
/// needs.
///
/// # Example
/// ```
/// use tessera_ecs::{Component, GroupId, System, World};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Position { x: f32 }
/// impl Component for Position {}
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Velocity { x: f32 }
/// impl Component for Velocity {}
///
/// #[derive(Default)]
/// struct MovementSystem {
///     moving: Option<GroupId>,
/// }
///
/// impl System for MovementSystem {
///     fn initialize(&mut self, world: &mut World) {
///         self.moving = Some(world.group_builder().all::<Position>().all::<Velocity>().build());
///     }
///
///     fn execute(&mut self, world: &mut World) {
///         let Some(moving) = self.moving else { return };
///         world.for_each_in_group(moving, |world, entity| {
///             let dx = world.get_component::<Velocity>(entity).map_or(0.0, |v| v.x);
///             if let Some(position) = world.get_component_mut::<Position>(entity) {
///                 position.x += dx;
///             }
///         });
///     }
/// }
///
/// let mut world = World::new();
/// let entity = world.spawn_entity();
/// world.add_component::<Position>(entity).unwrap();
/// world.add_component::<Velocity>(entity).unwrap().x = 2.0;
///
/// let mut movement = MovementSystem::default();
/// movement.initialize(&mut world);
/// movement.execute(&mut world);
///
/// assert_eq!(world.get_component::<Position>(entity).unwrap().x, 2.0);
/// ```
pub trait System {
    /// Called once before the first step.
    fn initialize(&mut self, _world: &mut World) {}

    /// Called once per simulation step.
    fn execute(&mut self, _world: &mut World) {}

    /// Called once when the simulation shuts down.
    fn teardown(&mut self, _world: &mut World) {}
}

/// An ordered collection of systems that runs as one.
///
/// Each phase visits the systems in the order they were added. A `Feature`
/// is itself a [`System`], so features can be nested to group related logic.
///
/// # Example
/// ```
/// use tessera_ecs::{Feature, System, World};
///
/// struct Tick;
/// impl System for Tick {}
///
/// let mut physics = Feature::new("physics");
/// physics.add_system(Tick);
///
/// let mut game = Feature::new("game");
/// game.add_system(physics);
/// game.add_system(Tick);
/// assert_eq!(game.system_count(), 2);
///
/// let mut world = World::new();
/// game.initialize(&mut world);
/// game.execute(&mut world);
/// game.teardown(&mut world);
/// ```
pub struct Feature {
    name: String,
    systems: Vec<Box<dyn System>>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            systems: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a system. Systems run in the order they were added.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl Default for Feature {
    fn default() -> Self {
        Self::new("feature")
    }
}

impl System for Feature {
    fn initialize(&mut self, world: &mut World) {
        tracing::debug!(feature = %self.name, systems = self.systems.len(), "initializing feature");
        for system in &mut self.systems {
            system.initialize(world);
        }
    }

    fn execute(&mut self, world: &mut World) {
        for system in &mut self.systems {
            system.execute(world);
        }
    }

    fn teardown(&mut self, world: &mut World) {
        tracing::debug!(feature = %self.name, "tearing down feature");
        for system in &mut self.systems {
            system.teardown(world);
        }
    }
}
