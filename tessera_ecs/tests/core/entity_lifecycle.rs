//! Entity Lifecycle Integration Tests
//!
//! Tests focused on entity creation, destruction and id recycling.

use tessera_ecs::{Component, EcsError, World, WorldConfig};

// Test Components
#[derive(Clone, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Health {
    value: u32,
}
impl Component for Health {}

#[test]
fn test_entity_spawn_destroy_cycle() {
    let mut world = World::new();

    let mut entities = Vec::new();
    for i in 0..10 {
        let entity = world.spawn_entity();
        *world.add_component::<Position>(entity).unwrap() = Position {
            x: i as f32,
            y: i as f32,
        };
        entities.push(entity);
    }
    assert_eq!(world.entity_count(), 10);

    for entity in entities.iter().step_by(2) {
        world.destroy_entity(*entity).unwrap();
    }

    assert_eq!(world.entity_count(), 5);
    assert_eq!(world.storage::<Position>().len(), 5);
    for (i, entity) in entities.iter().enumerate() {
        assert_eq!(world.is_entity_active(*entity), i % 2 == 1);
        assert_eq!(world.has_component::<Position>(*entity), i % 2 == 1);
    }
}

#[test]
fn test_recycled_id_starts_without_components() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Health>(entity).unwrap().value = 50;

    world.destroy_entity(entity).unwrap();
    let reborn = world.spawn_entity();

    assert_eq!(reborn, entity);
    assert!(!world.has_component::<Health>(reborn));
}

#[test]
fn test_entities_iterate_in_id_order() {
    let mut world = World::new();
    let spawned: Vec<_> = (0..6).map(|_| world.spawn_entity()).collect();
    world.destroy_entity(spawned[1]).unwrap();
    world.destroy_entity(spawned[4]).unwrap();

    let active: Vec<_> = world.entities().collect();
    assert_eq!(
        active,
        vec![spawned[0], spawned[2], spawned[3], spawned[5]]
    );
}

#[test]
fn test_double_destroy_reports_inactive() {
    let mut world = World::new();
    let entity = world.spawn_entity();

    assert!(world.destroy_entity(entity).is_ok());
    assert_eq!(
        world.destroy_entity(entity),
        Err(EcsError::EntityNotActive(entity))
    );
}

#[test]
fn test_many_entities_beyond_seed_capacity() {
    let mut world = World::with_config(
        WorldConfig::default()
            .with_entity_capacity(1)
            .with_component_capacity(1),
    );

    let entities: Vec<_> = (0..1_000).map(|_| world.spawn_entity()).collect();
    for entity in &entities {
        world.add_component::<Health>(*entity).unwrap().value = entity.id();
    }

    assert_eq!(world.entity_count(), 1_000);
    assert!(entities
        .iter()
        .all(|entity| world.get_component::<Health>(*entity).unwrap().value == entity.id()));
}

#[test]
fn test_clear_restarts_ids() {
    let mut world = World::new();
    for _ in 0..3 {
        let entity = world.spawn_entity();
        world.add_component::<Position>(entity).unwrap();
    }

    world.clear();

    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.spawn_entity().id(), 0);
    assert!(world.storage::<Position>().is_empty());
}
