//! Simulation Scenario Tests
//!
//! A small combat simulation driven through features and systems, using
//! groups for selection, links for targeting and reactive tracking for
//! reporting.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_ecs::{Component, Entity, Feature, GroupId, System, World};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}
impl Component for Velocity {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Health {
    current: i32,
}
impl Component for Health {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Attack {
    damage: i32,
}
impl Component for Attack {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Dead;
impl Component for Dead {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Frozen;
impl Component for Frozen {}

#[derive(Default)]
struct MovementSystem {
    movers: Option<GroupId>,
}

impl System for MovementSystem {
    fn initialize(&mut self, world: &mut World) {
        let group = world
            .group_builder()
            .all::<Position>()
            .all::<Velocity>()
            .none::<Frozen>()
            .build();
        self.movers = Some(group);
    }

    fn execute(&mut self, world: &mut World) {
        let Some(movers) = self.movers else { return };
        world.for_each_in_group(movers, |world, entity| {
            let velocity = *world.get_component::<Velocity>(entity).unwrap();
            let position = world.get_component_mut::<Position>(entity).unwrap();
            position.x += velocity.x;
            position.y += velocity.y;
        });
    }
}

#[derive(Default)]
struct CombatSystem {
    attackers: Option<GroupId>,
}

impl System for CombatSystem {
    fn initialize(&mut self, world: &mut World) {
        self.attackers = Some(world.group_builder().all::<Attack>().none::<Dead>().build());
    }

    fn execute(&mut self, world: &mut World) {
        let Some(attackers) = self.attackers else { return };
        world.for_each_in_group(attackers, |world, attacker| {
            let damage = world.get_component::<Attack>(attacker).unwrap().damage;
            world.for_each_linked::<Health, _>(attacker, |world, target| {
                let health = world.get_component_mut::<Health>(target).unwrap();
                health.current -= damage;
                if health.current <= 0 {
                    world.add_component::<Dead>(target).unwrap();
                }
            });
        });
    }
}

struct CleanupSystem {
    removed: Rc<RefCell<Vec<Entity>>>,
}

impl System for CleanupSystem {
    fn initialize(&mut self, world: &mut World) {
        world.track_changes::<Health>();
    }

    fn execute(&mut self, world: &mut World) {
        world.for_each::<Dead, _>(|world, entity| {
            world.destroy_entity(entity).unwrap();
        });
        self.removed
            .borrow_mut()
            .extend_from_slice(world.reactive::<Health>().removed());
        world.update_reactive();
    }

    fn teardown(&mut self, world: &mut World) {
        world.clear();
    }
}

fn spawn_fighter(world: &mut World, health: i32, damage: i32) -> Entity {
    let entity = world.spawn_entity();
    world.add_component::<Health>(entity).unwrap().current = health;
    world.add_component::<Attack>(entity).unwrap().damage = damage;
    entity
}

#[test]
fn test_movement_respects_frozen() {
    let mut world = World::new();
    let runner = world.spawn_entity();
    let statue = world.spawn_entity();
    for entity in [runner, statue] {
        world.add_component::<Position>(entity).unwrap();
        *world.add_component::<Velocity>(entity).unwrap() = Velocity { x: 1.0, y: 2.0 };
    }
    world.add_component::<Frozen>(statue).unwrap();

    let mut movement = MovementSystem::default();
    movement.initialize(&mut world);
    for _ in 0..3 {
        movement.execute(&mut world);
    }

    assert_eq!(
        world.get_component::<Position>(runner),
        Some(&Position { x: 3.0, y: 6.0 })
    );
    assert_eq!(
        world.get_component::<Position>(statue),
        Some(&Position::default())
    );

    world.remove_component::<Frozen>(statue);
    movement.execute(&mut world);
    assert_eq!(world.get_component::<Position>(statue).unwrap().x, 1.0);
}

#[test]
fn test_combat_feature_runs_until_one_survivor() {
    let removed = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    let knight = spawn_fighter(&mut world, 30, 10);
    let goblin = spawn_fighter(&mut world, 15, 4);
    let rat = spawn_fighter(&mut world, 5, 1);
    world.link(knight, goblin).unwrap();
    world.link(knight, rat).unwrap();

    let mut game = Feature::new("game");
    game.add_system(CombatSystem::default())
        .add_system(CleanupSystem {
            removed: Rc::clone(&removed),
        });

    game.initialize(&mut world);

    game.execute(&mut world);
    assert!(!world.is_entity_active(rat));
    assert!(world.is_entity_active(goblin));
    assert_eq!(world.get_component::<Health>(knight).unwrap().current, 25);
    assert_eq!(*removed.borrow(), vec![rat]);

    game.execute(&mut world);
    assert!(!world.is_entity_active(goblin));
    assert_eq!(world.get_component::<Health>(knight).unwrap().current, 21);
    assert_eq!(*removed.borrow(), vec![rat, goblin]);
    assert_eq!(world.entity_count(), 1);
    assert!(world.links().links_of(knight).next().is_none());

    game.teardown(&mut world);
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn test_nested_features_share_one_world() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Position>(entity).unwrap();
    world.add_component::<Velocity>(entity).unwrap().x = 0.5;

    let mut physics = Feature::new("physics");
    physics.add_system(MovementSystem::default());
    let mut root = Feature::new("root");
    root.add_system(physics);

    root.initialize(&mut world);
    root.execute(&mut world);
    root.execute(&mut world);

    assert_eq!(world.get_component::<Position>(entity).unwrap().x, 1.0);
    assert_eq!(world.group_count(), 1);
}
