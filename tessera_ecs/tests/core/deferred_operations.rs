//! Deferred Operation Integration Tests
//!
//! Tests for structural changes made while a store is locked by an
//! iteration session.

use tessera_ecs::{Component, ComponentId, ComponentStore, Entity, Notification, World};

#[derive(Clone, Debug, Default, PartialEq)]
struct Burning {
    turns: u32,
}
impl Component for Burning {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Ash;
impl Component for Ash {}

#[test]
fn test_locked_add_notifies_before_deferred_remove() {
    let mut store = ComponentStore::<Burning>::new(ComponentId::new(0), 4, 4);
    let a = Entity::from_raw(0);
    let b = Entity::from_raw(1);
    store.add(b);
    store.drain_notifications().for_each(drop);

    store.lock();
    store.add(a);
    store.remove(b);
    assert!(store.has(a));
    assert!(store.has(b));
    assert_eq!(store.len(), 2);
    store.unlock();

    assert_eq!(
        store.drain_notifications().collect::<Vec<_>>(),
        vec![Notification::Added(a), Notification::Removed(b)]
    );
    assert!(!store.has(b));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_group_sees_deferred_changes_after_session() {
    let mut world = World::new();
    let entities: Vec<_> = (0..4).map(|_| world.spawn_entity()).collect();
    for entity in &entities {
        world.add_component::<Burning>(*entity).unwrap().turns = entity.id() % 2 + 1;
    }
    let burning = world.group_builder().all::<Burning>().build();
    let ashes = world.group_builder().all::<Ash>().build();

    world.for_each::<Burning, _>(|world, entity| {
        let fire = world.get_component_mut::<Burning>(entity).unwrap();
        fire.turns -= 1;
        if fire.turns == 0 {
            world.remove_component::<Burning>(entity);
            world.add_component::<Ash>(entity).unwrap();
        }
    });

    assert_eq!(world.group_entities(burning), &[entities[1], entities[3]]);
    assert_eq!(world.group_entities(ashes), &[entities[0], entities[2]]);
}

#[test]
fn test_destroy_inside_session_keeps_walk_stable() {
    let mut world = World::new();
    let entities: Vec<_> = (0..6).map(|_| world.spawn_entity()).collect();
    for entity in &entities {
        world.add_component::<Burning>(*entity).unwrap();
    }

    let mut visited = Vec::new();
    world.for_each::<Burning, _>(|world, entity| {
        visited.push(entity);
        if entity.id() % 3 == 0 {
            world.destroy_entity(entity).unwrap();
        }
    });

    assert_eq!(visited, entities);
    assert_eq!(world.storage::<Burning>().len(), 4);
    assert_eq!(world.entity_count(), 4);
}

#[test]
fn test_destroying_unvisited_entity_skips_it() {
    let mut world = World::new();
    let first = world.spawn_entity();
    let second = world.spawn_entity();
    world.add_component::<Burning>(first).unwrap();
    world.add_component::<Burning>(second).unwrap();

    let mut visited = Vec::new();
    world.for_each::<Burning, _>(|world, entity| {
        visited.push(entity);
        if entity == first {
            world.destroy_entity(second).unwrap();
        }
    });

    assert_eq!(visited, vec![first]);
    assert!(!world.has_component::<Burning>(second));
}

#[test]
fn test_recycled_id_never_receives_stale_removal() {
    let mut world = World::new();
    let doomed = world.spawn_entity();
    world.add_component::<Burning>(doomed).unwrap();

    let mut newcomer = None;
    world.for_each::<Burning, _>(|world, entity| {
        world.destroy_entity(entity).unwrap();
        let spawned = world.spawn_entity();
        world.add_component::<Ash>(spawned).unwrap();
        newcomer = Some(spawned);
    });

    let newcomer = newcomer.unwrap();
    assert_ne!(newcomer, doomed);
    assert!(world.has_component::<Ash>(newcomer));
    assert!(world.storage::<Burning>().is_empty());

    let recycled = world.spawn_entity();
    assert_eq!(recycled, doomed);
    world.add_component::<Burning>(recycled).unwrap();
    assert!(world.has_component::<Burning>(recycled));
}

#[test]
fn test_lock_storage_is_reference_counted() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Burning>(entity).unwrap();

    world.lock_storage::<Burning>();
    world.lock_storage::<Burning>();
    world.remove_component::<Burning>(entity);

    world.unlock_storage::<Burning>();
    assert!(world.has_component::<Burning>(entity));
    assert_eq!(world.storage::<Burning>().deferred().removed(), &[entity]);

    world.unlock_storage::<Burning>();
    assert!(!world.has_component::<Burning>(entity));
    assert!(!world.is_iterating());
}

#[test]
fn test_readd_inside_session_survives_session_end() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Burning>(entity).unwrap().turns = 3;
    let burning = world.group_builder().all::<Burning>().build();

    world.for_each::<Burning, _>(|world, entity| {
        world.remove_component::<Burning>(entity);
        world.add_component::<Burning>(entity).unwrap().turns = 7;
    });

    assert_eq!(world.get_component::<Burning>(entity), Some(&Burning { turns: 7 }));
    assert_eq!(world.group_entities(burning), &[entity]);
}
