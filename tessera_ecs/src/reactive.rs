//! Snapshot-diff change detection over a component store.
//!
//! A [`ReactiveStore`] keeps a copy of its store as of the last
//! [`update`](ReactiveStore::update) and reports, for the window since then:
//!
//! - entities whose component was added (from store notifications)
//! - entities whose component was removed (from store notifications)
//! - entities present before and now whose value differs from the copy

use std::any::Any;

use crate::component::{Component, ComponentId, Storages};
use crate::storage::{ComponentStore, Notification, StoreSnapshot};
use crate::Entity;

/// Added/removed/changed tracking for one component type.
#[derive(Debug)]
pub struct ReactiveStore<T: Component + Clone> {
    component: ComponentId,
    previous: StoreSnapshot<T>,
    added: Vec<Entity>,
    removed: Vec<Entity>,
    changed: Vec<Entity>,
    changed_version: Option<u64>,
}

impl<T: Component + Clone> ReactiveStore<T> {
    /// Starts tracking `store`, taking its current contents as the baseline.
    pub fn new(store: &ComponentStore<T>) -> Self {
        let mut previous = StoreSnapshot::new();
        store.copy_into(&mut previous);
        Self {
            component: store.id(),
            previous,
            added: Vec::new(),
            removed: Vec::new(),
            changed: Vec::new(),
            changed_version: None,
        }
    }

    pub fn component_id(&self) -> ComponentId {
        self.component
    }

    /// Closes the observation window: the store's current contents become the
    /// new baseline and the added/removed buffers start over.
    pub fn update(&mut self, store: &ComponentStore<T>) {
        store.copy_into(&mut self.previous);
        self.added.clear();
        self.removed.clear();
        self.changed.clear();
        self.changed_version = None;
    }

    /// Entities that received the component since the last update.
    pub fn added(&self) -> &[Entity] {
        &self.added
    }

    /// Entities that lost the component since the last update.
    pub fn removed(&self) -> &[Entity] {
        &self.removed
    }

    /// Entities whose value differs from the baseline, in store order.
    ///
    /// The result is cached against the store version, so calling this again
    /// without touching the store does not rescan.
    pub fn changed(&mut self, store: &ComponentStore<T>) -> &[Entity]
    where
        T: PartialEq,
    {
        if self.changed_version != Some(store.version()) {
            self.collect_changed(store, |previous, current| previous != current);
            self.changed_version = Some(store.version());
        }
        &self.changed
    }

    /// Like [`changed`](Self::changed) with a caller supplied difference
    /// predicate `differs(previous, current)`. Never cached.
    pub fn changed_by<F>(&mut self, store: &ComponentStore<T>, differs: F) -> &[Entity]
    where
        F: Fn(&T, &T) -> bool,
    {
        self.collect_changed(store, differs);
        self.changed_version = None;
        &self.changed
    }

    /// Whether `entity` existed at the baseline with a different value.
    pub fn is_changed(&self, entity: Entity, store: &ComponentStore<T>) -> bool
    where
        T: PartialEq,
    {
        match (self.previous.get(entity), store.try_get(entity)) {
            (Some(previous), Some(current)) => previous != current,
            _ => false,
        }
    }

    /// Value of the component at the last update.
    pub fn previous(&self, entity: Entity) -> Option<&T> {
        self.previous.get(entity)
    }

    pub fn previous_len(&self) -> usize {
        self.previous.len()
    }

    pub fn record(&mut self, notification: Notification) {
        match notification {
            Notification::Added(entity) => self.added.push(entity),
            Notification::Removed(entity) => self.removed.push(entity),
        }
    }

    pub fn clear(&mut self) {
        self.previous.clear();
        self.added.clear();
        self.removed.clear();
        self.changed.clear();
        self.changed_version = None;
    }

    fn collect_changed<F>(&mut self, store: &ComponentStore<T>, differs: F)
    where
        F: Fn(&T, &T) -> bool,
    {
        self.changed.clear();
        for (entity, current) in store.iter() {
            if let Some(previous) = self.previous.get(entity) {
                if differs(previous, current) {
                    self.changed.push(entity);
                }
            }
        }
    }
}

/// Type-erased access used by the world to feed and refresh trackers.
pub trait AnyReactive: Any {
    fn component_id(&self) -> ComponentId;

    fn record(&mut self, notification: Notification);

    /// Refreshes the baseline from the tracked store in `storages`.
    fn update(&mut self, storages: &Storages);

    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component + Clone> AnyReactive for ReactiveStore<T> {
    fn component_id(&self) -> ComponentId {
        self.component
    }

    fn record(&mut self, notification: Notification) {
        ReactiveStore::record(self, notification);
    }

    fn update(&mut self, storages: &Storages) {
        let store = storages
            .get(self.component.index())
            .and_then(|store| store.as_any().downcast_ref::<ComponentStore<T>>());
        if let Some(store) = store {
            ReactiveStore::update(self, store);
        }
    }

    fn clear(&mut self) {
        ReactiveStore::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A tracker paired with the store it watches, borrowed from a
/// [`World`](crate::World).
///
/// # Example
/// ```
/// use tessera_ecs::{Component, World};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Position { x: i32 }
/// impl Component for Position {}
///
/// let mut world = World::new();
/// let entity = world.spawn_entity();
/// world.add_component::<Position>(entity).unwrap();
/// world.reactive::<Position>().update();
///
/// world.get_component_mut::<Position>(entity).unwrap().x = 5;
/// assert_eq!(world.reactive::<Position>().changed(), &[entity]);
///
/// world.reactive::<Position>().update();
/// assert!(world.reactive::<Position>().changed().is_empty());
/// ```
pub struct Reactive<'w, T: Component + Clone> {
    tracker: &'w mut ReactiveStore<T>,
    store: &'w ComponentStore<T>,
}

impl<'w, T: Component + Clone> Reactive<'w, T> {
    pub(crate) fn new(tracker: &'w mut ReactiveStore<T>, store: &'w ComponentStore<T>) -> Self {
        Self { tracker, store }
    }

    pub fn update(&mut self) {
        self.tracker.update(self.store);
    }

    pub fn added(&self) -> &[Entity] {
        self.tracker.added()
    }

    pub fn removed(&self) -> &[Entity] {
        self.tracker.removed()
    }

    pub fn changed(&mut self) -> &[Entity]
    where
        T: PartialEq,
    {
        self.tracker.changed(self.store)
    }

    pub fn changed_by<F>(&mut self, differs: F) -> &[Entity]
    where
        F: Fn(&T, &T) -> bool,
    {
        self.tracker.changed_by(self.store, differs)
    }

    pub fn previous(&self, entity: Entity) -> Option<&T> {
        self.tracker.previous(entity)
    }

    pub fn current(&self, entity: Entity) -> Option<&T> {
        self.store.try_get(entity)
    }
}
