//! Component Lifecycle Integration Tests
//!
//! Tests focused on component add, access, update and removal, and on the
//! sparse-set layout underneath.

use tessera_ecs::{Component, ComponentId, ComponentStore, EcsError, Entity, Notification, World};

#[derive(Clone, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Inventory {
    items: Vec<String>,
}
impl Component for Inventory {}

fn e(id: u32) -> Entity {
    Entity::from_raw(id)
}

fn assert_bijection(store: &ComponentStore<Position>) {
    for (index, entity) in store.entities().iter().enumerate() {
        assert!(store.has(*entity));
        assert_eq!(store.entity_at(index), *entity);
    }
    let unique: std::collections::HashSet<_> = store.entities().iter().collect();
    assert_eq!(unique.len(), store.len());
}

#[test]
fn test_add_returns_slot_for_in_place_initialization() {
    let mut world = World::new();
    let entity = world.spawn_entity();

    world
        .add_component::<Inventory>(entity)
        .unwrap()
        .items
        .push("sword".to_string());
    world
        .add_component::<Inventory>(entity)
        .unwrap()
        .items
        .push("shield".to_string());

    assert_eq!(
        world.get_component::<Inventory>(entity).unwrap().items,
        vec!["sword", "shield"]
    );
    assert_eq!(world.storage::<Inventory>().len(), 1);
}

#[test]
fn test_swap_delete_relocates_last_entity() {
    let mut store = ComponentStore::<Position>::new(ComponentId::new(0), 4, 4);
    for id in 0..5 {
        store.add(e(id)).x = id as f32;
    }

    store.remove(e(1));

    assert_eq!(store.entities(), &[e(0), e(4), e(2), e(3)]);
    assert_eq!(store.get(e(4)).x, 4.0);
    assert_bijection(&store);

    let visited: Vec<_> = store.iter().map(|(entity, _)| entity).collect();
    assert_eq!(visited.len(), 4);
    assert!(!visited.contains(&e(1)));
}

#[test]
fn test_bijection_survives_mixed_operations() {
    let mut store = ComponentStore::<Position>::new(ComponentId::new(0), 1, 1);
    for id in (0..40).rev() {
        store.add(e(id * 3));
    }
    for id in (0..40).filter(|id| id % 3 == 0) {
        store.remove(e(id * 3));
    }
    for id in 0..10 {
        store.add(e(id * 7 + 1));
    }

    assert_bijection(&store);
    assert!(!store.has(e(0)));
    assert!(store.has(e(3)));
    assert!(store.has(e(64)));
}

#[test]
fn test_store_notifications_in_order() {
    let mut store = ComponentStore::<Position>::new(ComponentId::new(0), 4, 4);
    store.add(e(0));
    store.add(e(1));
    store.remove(e(0));
    store.remove(e(0));

    assert_eq!(
        store.drain_notifications().collect::<Vec<_>>(),
        vec![
            Notification::Added(e(0)),
            Notification::Added(e(1)),
            Notification::Removed(e(0)),
        ]
    );
}

#[test]
fn test_has_is_safe_for_unseen_ids() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Position>(entity).unwrap();

    let store = world.storage::<Position>();
    assert!(!store.has(e(u32::MAX)));
    assert!(store.try_get(e(10_000)).is_none());
}

#[test]
#[should_panic(expected = "has no")]
fn test_get_absent_component_panics() {
    let mut world = World::new();
    let entity = world.spawn_entity();

    world.storage::<Position>().get(entity);
}

#[test]
fn test_update_component_in_place() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Position>(entity).unwrap();

    world
        .update_component::<Position>(entity, |position| {
            position.x += 1.5;
            position.y -= 2.0;
        })
        .unwrap();

    assert_eq!(
        world.get_component::<Position>(entity),
        Some(&Position { x: 1.5, y: -2.0 })
    );
}

#[test]
fn test_update_missing_component() {
    let mut world = World::new();
    let entity = world.spawn_entity();

    let result = world.update_component::<Position>(entity, |position| position.x = 1.0);

    assert!(matches!(result, Err(EcsError::ComponentMissing { .. })));
}

#[test]
fn test_components_of_destroyed_entity_are_unreachable() {
    let mut world = World::new();
    let entity = world.spawn_entity();
    world.add_component::<Position>(entity).unwrap();
    world.destroy_entity(entity).unwrap();

    assert!(world.get_component::<Position>(entity).is_none());
    assert!(world.get_component_mut::<Position>(entity).is_none());
    assert!(!world.remove_component::<Position>(entity));
}
