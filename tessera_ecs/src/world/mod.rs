use std::any::TypeId;
use std::collections::HashMap;
use std::mem;

use crate::component::{AnyStorage, ComponentId};
use crate::dispatch::{Dispatcher, Subscriber};
use crate::group::GroupRegistry;
use crate::links::LinkGraph;
use crate::matcher::Transition;
use crate::reactive::AnyReactive;
use crate::storage::Notification;
use crate::{EntityTable, WorldConfig};

mod components;
mod entities;
mod groups;
mod iteration;
mod links;
mod reactive;
mod storage;

/// The composition root: owns entities, component stores, groups, reactive
/// trackers and the link graph, and routes store notifications between them.
///
/// Structural changes made through the world are dispatched as soon as the
/// affected store raises them, so groups are always current outside of
/// iteration sessions. Inside a session (see [`World::for_each`]) the locked
/// stores hold their notifications back until the session ends.
///
/// # Example
/// ```
/// use tessera_ecs::{Component, World};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {}
///
/// let mut world = World::new();
/// let entity = world.spawn_entity();
///
/// world.add_component::<Position>(entity).unwrap().x = 10.0;
/// assert!(world.has_component::<Position>(entity));
///
/// world.destroy_entity(entity).unwrap();
/// assert!(!world.has_component::<Position>(entity));
/// ```
pub struct World {
    config: WorldConfig,
    entities: EntityTable,
    component_ids: HashMap<TypeId, ComponentId>,
    storages: Vec<Box<dyn AnyStorage>>,
    pub(crate) groups: GroupRegistry,
    reactive_slots: HashMap<TypeId, usize>,
    reactives: Vec<Box<dyn AnyReactive>>,
    dispatcher: Dispatcher,
    links: LinkGraph,
    notification_buffer: Vec<Notification>,
    iteration_depth: usize,
}

impl World {
    /// Creates a new empty World.
    ///
    /// # Example
    /// ```
    /// use tessera_ecs::World;
    ///
    /// let world = World::new();
    /// assert_eq!(world.entity_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            entities: EntityTable::new(config.entity_capacity),
            component_ids: HashMap::new(),
            storages: Vec::new(),
            groups: GroupRegistry::new(config.group_capacity),
            reactive_slots: HashMap::new(),
            reactives: Vec::new(),
            dispatcher: Dispatcher::new(),
            links: LinkGraph::new(config.entity_capacity),
            notification_buffer: Vec::new(),
            iteration_depth: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Whether at least one iteration session is open.
    pub fn is_iterating(&self) -> bool {
        self.iteration_depth > 0
    }

    /// Drops every entity, component, group member, reactive baseline and
    /// link.
    ///
    /// Component registrations, group handles and reactive trackers survive,
    /// so handles obtained before the call keep working on the emptied world.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an iteration session.
    pub fn clear(&mut self) {
        assert!(
            self.iteration_depth == 0,
            "world cleared during an iteration session"
        );

        self.entities.clear();
        self.storages.iter_mut().for_each(|store| store.clear());
        self.groups.clear_members();
        self.reactives.iter_mut().for_each(|tracker| tracker.clear());
        self.links.clear();
        self.notification_buffer.clear();

        tracing::debug!(
            stores = self.storages.len(),
            groups = self.groups.len(),
            "world cleared"
        );
    }

    /// Delivers every pending notification of one store to its subscribers.
    pub(crate) fn dispatch(&mut self, component: ComponentId) {
        let Some(store) = self.storages.get_mut(component.index()) else {
            return;
        };

        let mut buffer = mem::take(&mut self.notification_buffer);
        store.swap_notifications(&mut buffer);

        for notification in buffer.drain(..) {
            let entity = notification.entity();
            for subscriber in self.dispatcher.recipients(component, notification) {
                match subscriber {
                    Subscriber::Group(group) => {
                        let Some(group) = self.groups.get_mut(group) else {
                            continue;
                        };
                        let is_member = group.contains(entity);
                        let Some(transition) =
                            group.matcher().transition(entity, &self.storages, is_member)
                        else {
                            continue;
                        };
                        // Destroyed entities can still raise removals; they must not rejoin.
                        if transition == Transition::Unmatched || self.entities.is_active(entity) {
                            group.apply(transition, entity);
                        }
                    }
                    Subscriber::Reactive(slot) => {
                        if let Some(tracker) = self.reactives.get_mut(slot) {
                            tracker.record(notification);
                        }
                    }
                }
            }
        }

        self.notification_buffer = buffer;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
