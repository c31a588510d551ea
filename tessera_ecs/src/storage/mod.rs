//! Sparse-set component storage.
//!
//! A [`ComponentStore`] keeps three parallel arrays for one component type:
//!
//! - `dense`: the live component values, packed in `0..len`
//! - `dense_to_entity`: the owner of each dense slot
//! - `entity_to_dense`: indexed by entity id, `0` for "absent", otherwise the
//!   dense index plus one
//!
//! Add, remove and lookup are O(1). Removal swaps the last slot into the hole,
//! which relocates another entity, so removals are deferred while the store is
//! locked by an iteration session.

use std::any::{type_name, Any};
use std::mem;

use crate::component::{AnyStorage, Component, ComponentId};
use crate::links::LinkGraph;
use crate::Entity;

mod deferred;

pub use deferred::DeferredOps;

/// Structural change raised by a store, consumed by the world's dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    Added(Entity),
    Removed(Entity),
}

/// Which side of a [`Notification`] a subscriber listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Added,
    Removed,
}

impl Notification {
    pub fn entity(self) -> Entity {
        match self {
            Notification::Added(entity) | Notification::Removed(entity) => entity,
        }
    }

    pub fn kind(self) -> NotificationKind {
        match self {
            Notification::Added(_) => NotificationKind::Added,
            Notification::Removed(_) => NotificationKind::Removed,
        }
    }
}

/// Returns the smallest doubling of `current` that can index `index`.
///
/// # Panics
///
/// Panics when doubling would overflow `usize`.
pub(crate) fn grown_capacity(current: usize, index: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity <= index {
        capacity = capacity.checked_mul(2).expect("capacity overflow");
    }
    capacity
}

/// Owned copy of a store's arrays, taken by [`ComponentStore::copy_into`].
#[derive(Debug)]
pub struct StoreSnapshot<T> {
    values: Vec<T>,
    entities: Vec<Entity>,
    index: Vec<u32>,
}

impl<T> StoreSnapshot<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            entities: Vec::new(),
            index: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value the entity had when the snapshot was taken.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.index.get(entity.index()) {
            Some(&slot) if slot > 0 => self.values.get(slot as usize - 1),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.entities.clear();
        self.index.clear();
    }
}

impl<T> Default for StoreSnapshot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse-set storage for every instance of one component type.
///
/// # Locking
///
/// [`lock`](Self::lock) and [`unlock`](Self::unlock) are reference counted.
/// While the count is above zero:
///
/// - [`add`](Self::add) writes the slot immediately but queues the "added"
///   notification
/// - [`remove`](Self::remove) is queued entirely, the entity stays in place
///
/// Releasing the last lock replays queued notifications for additions, then
/// performs queued removals, each in the order they were requested.
///
/// # Example
/// ```
/// use tessera_ecs::{Component, ComponentId, ComponentStore, Entity, Notification};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {}
///
/// let mut store = ComponentStore::<Position>::new(ComponentId::new(0), 8, 8);
/// let a = Entity::from_raw(0);
/// let b = Entity::from_raw(1);
/// store.add(b);
///
/// store.lock();
/// store.add(a).x = 3.0;
/// store.remove(b);
/// assert!(store.has(a));
/// assert!(store.has(b));
/// store.unlock();
///
/// assert!(!store.has(b));
/// assert_eq!(store.get(a).x, 3.0);
/// let raised: Vec<_> = store.drain_notifications().collect();
/// assert_eq!(
///     raised,
///     vec![Notification::Added(b), Notification::Added(a), Notification::Removed(b)]
/// );
/// ```
#[derive(Debug)]
pub struct ComponentStore<T: Component> {
    id: ComponentId,
    dense: Vec<T>,
    dense_to_entity: Vec<Entity>,
    entity_to_dense: Vec<u32>,
    component_capacity: usize,
    lock_count: usize,
    deferred: DeferredOps,
    notifications: Vec<Notification>,
    version: u64,
}

impl<T: Component> ComponentStore<T> {
    /// Creates an empty store.
    ///
    /// `entity_capacity` seeds the sparse index; `component_capacity` seeds the
    /// dense arrays, which are only allocated on the first add.
    pub fn new(id: ComponentId, entity_capacity: usize, component_capacity: usize) -> Self {
        Self {
            id,
            dense: Vec::new(),
            dense_to_entity: Vec::new(),
            entity_to_dense: vec![0; entity_capacity.max(1)],
            component_capacity: component_capacity.max(1),
            lock_count: 0,
            deferred: DeferredOps::default(),
            notifications: Vec::new(),
            version: 0,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Number of live components, including additions whose notification is
    /// still deferred and removals that have not been applied yet.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Mutation stamp. Bumped by every add, applied removal and mutable access.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_locked(&self) -> bool {
        self.lock_count > 0
    }

    pub fn deferred(&self) -> &DeferredOps {
        &self.deferred
    }

    /// Attaches a default component to `entity` and returns its slot.
    ///
    /// If the entity already has one, the existing slot is returned untouched.
    /// While locked, adding back a component whose removal is still queued
    /// cancels that removal and resets the slot to its default value.
    pub fn add(&mut self, entity: Entity) -> &mut T {
        self.version += 1;
        if let Some(index) = self.dense_index(entity) {
            if self.deferred.cancel_remove(entity) {
                self.dense[index] = T::default();
            }
            return &mut self.dense[index];
        }

        self.ensure_sparse(entity);
        self.reserve_slot();

        let index = self.dense.len();
        self.dense.push(T::default());
        self.dense_to_entity.push(entity);
        self.link(entity, index);

        if self.is_locked() {
            self.deferred.defer_add(entity);
        } else {
            self.notifications.push(Notification::Added(entity));
        }

        &mut self.dense[index]
    }

    /// Detaches the component from `entity`. Absent components are ignored.
    pub fn remove(&mut self, entity: Entity) {
        let Some(index) = self.dense_index(entity) else {
            return;
        };

        if self.is_locked() {
            self.deferred.defer_remove(entity);
            return;
        }

        let last = self.dense.len() - 1;
        self.dense.swap_remove(index);
        self.dense_to_entity.swap_remove(index);
        if index != last {
            let moved = self.dense_to_entity[index];
            self.link(moved, index);
        }
        self.entity_to_dense[entity.index()] = 0;

        self.version += 1;
        self.notifications.push(Notification::Removed(entity));
    }

    /// Returns the component of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no such component; check with
    /// [`has`](Self::has) or use [`try_get`](Self::try_get).
    pub fn get(&self, entity: Entity) -> &T {
        match self.dense_index(entity) {
            Some(index) => &self.dense[index],
            None => panic!("{entity} has no {} component", type_name::<T>()),
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if the entity has no such component.
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        match self.dense_index(entity) {
            Some(index) => {
                self.version += 1;
                &mut self.dense[index]
            }
            None => panic!("{entity} has no {} component", type_name::<T>()),
        }
    }

    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|index| &self.dense[index])
    }

    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        self.version += 1;
        Some(&mut self.dense[index])
    }

    /// O(1) membership test. Ids beyond the sparse index are simply absent.
    pub fn has(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Owner of the dense slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn entity_at(&self, index: usize) -> Entity {
        self.dense_to_entity[index]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.dense_to_entity
    }

    pub fn values(&self) -> &[T] {
        &self.dense
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        self.version += 1;
        &mut self.dense
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense_to_entity.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.version += 1;
        self.dense_to_entity.iter().copied().zip(self.dense.iter_mut())
    }

    /// Owners of this component that are linked to `entity`, in dense order.
    pub fn linked_entities(&self, entity: Entity, links: &LinkGraph) -> Vec<Entity> {
        self.dense_to_entity
            .iter()
            .copied()
            .filter(|other| links.has_link(entity, *other))
            .collect()
    }

    pub fn lock(&mut self) {
        self.lock_count += 1;
    }

    /// Releases one lock; the last release flushes deferred operations.
    ///
    /// # Panics
    ///
    /// Panics if the store is not locked.
    pub fn unlock(&mut self) {
        assert!(
            self.lock_count > 0,
            "unlock called on unlocked {} store",
            type_name::<T>()
        );
        self.lock_count -= 1;
        if self.lock_count == 0 {
            self.flush_deferred();
        }
    }

    /// Notifications raised since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> std::vec::Drain<'_, Notification> {
        self.notifications.drain(..)
    }

    /// Copies the live arrays into `snapshot`, reusing its allocations.
    pub fn copy_into(&self, snapshot: &mut StoreSnapshot<T>)
    where
        T: Clone,
    {
        snapshot.values.clone_from(&self.dense);
        snapshot.entities.clone_from(&self.dense_to_entity);
        snapshot.index.clone_from(&self.entity_to_dense);
    }

    /// Drops every component without raising notifications.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.dense_to_entity.clear();
        self.entity_to_dense.fill(0);
        self.lock_count = 0;
        self.deferred.clear();
        self.notifications.clear();
        self.version += 1;
    }

    fn flush_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }

        let mut deferred = mem::take(&mut self.deferred);
        tracing::trace!(
            component = type_name::<T>(),
            added = deferred.added().len(),
            removed = deferred.removed().len(),
            "flushing deferred operations"
        );

        self.notifications
            .extend(deferred.added().iter().copied().map(Notification::Added));
        for entity in deferred.removed() {
            self.remove(*entity);
        }

        deferred.clear();
        self.deferred = deferred;
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.entity_to_dense.get(entity.index()) {
            Some(&slot) if slot > 0 => Some(slot as usize - 1),
            _ => None,
        }
    }

    fn link(&mut self, entity: Entity, index: usize) {
        self.entity_to_dense[entity.index()] =
            u32::try_from(index + 1).expect("dense index exceeds the entity id space");
    }

    fn ensure_sparse(&mut self, entity: Entity) {
        let index = entity.index();
        if index >= self.entity_to_dense.len() {
            let len = grown_capacity(self.entity_to_dense.len(), index);
            self.entity_to_dense.resize(len, 0);
        }
    }

    fn reserve_slot(&mut self) {
        let len = self.dense.len();
        if len < self.dense.capacity() {
            return;
        }

        let target = if self.dense.capacity() == 0 {
            self.component_capacity
        } else {
            grown_capacity(self.dense.capacity(), len)
        };
        self.dense.reserve_exact(target - len);
        self.dense_to_entity
            .reserve_exact(target - self.dense_to_entity.len());
    }
}

impl<T: Component> AnyStorage for ComponentStore<T> {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn component_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentStore::has(self, entity)
    }

    fn remove(&mut self, entity: Entity) {
        ComponentStore::remove(self, entity);
    }

    fn lock(&mut self) {
        ComponentStore::lock(self);
    }

    fn unlock(&mut self) {
        ComponentStore::unlock(self);
    }

    fn is_locked(&self) -> bool {
        ComponentStore::is_locked(self)
    }

    fn swap_notifications(&mut self, buffer: &mut Vec<Notification>) {
        debug_assert!(buffer.is_empty());
        mem::swap(&mut self.notifications, buffer);
    }

    fn clear(&mut self) {
        ComponentStore::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
