//! Iteration sessions.
//!
//! A session locks the stores it walks for as long as the callback runs.
//! Inside it, callbacks get the whole world back and may add, remove and
//! destroy freely:
//!
//! - components added to a locked store are visible right away but groups
//!   only hear about them when the session ends
//! - removals from a locked store are queued and applied when the session
//!   ends, so the walk never skips or repeats an entity
//! - entities added during the walk are not visited by it
//! - entities destroyed during the walk are skipped

use crate::group::GroupId;
use crate::{Component, ComponentId, Entity};

use super::World;

impl World {
    /// Calls `f` for every entity that has `T`, in store order.
    ///
    /// # Example
    /// ```
    /// use tessera_ecs::{Component, World};
    ///
    /// #[derive(Debug, Clone, Default, PartialEq)]
    /// struct Poison { ticks: u32 }
    /// impl Component for Poison {}
    ///
    /// let mut world = World::new();
    /// for ticks in [1, 3] {
    ///     let entity = world.spawn_entity();
    ///     world.add_component::<Poison>(entity).unwrap().ticks = ticks;
    /// }
    ///
    /// world.for_each::<Poison, _>(|world, entity| {
    ///     let poison = world.get_component_mut::<Poison>(entity).unwrap();
    ///     poison.ticks -= 1;
    ///     if poison.ticks == 0 {
    ///         world.remove_component::<Poison>(entity);
    ///     }
    /// });
    ///
    /// assert_eq!(world.storage::<Poison>().len(), 1);
    /// ```
    pub fn for_each<T, F>(&mut self, mut f: F)
    where
        T: Component,
        F: FnMut(&mut World, Entity),
    {
        let id = self.register::<T>();
        self.begin_session(&[id]);

        let count = self.store::<T>(id).len();
        for index in 0..count {
            let Some(entity) = self.store::<T>(id).entities().get(index).copied() else {
                break;
            };
            if self.is_entity_active(entity) {
                f(self, entity);
            }
        }

        self.end_session(&[id]);
    }

    /// Calls `f` for every member of a group, in snapshot order.
    ///
    /// Every store the group's matcher references stays locked for the whole
    /// walk, so membership changes caused by `f` take effect afterwards.
    pub fn for_each_in_group<F>(&mut self, id: GroupId, mut f: F)
    where
        F: FnMut(&mut World, Entity),
    {
        let Some(group) = self.groups.get_mut(id) else {
            return;
        };
        let members = group.entities().to_vec();
        let mut components: Vec<ComponentId> = group.matcher().components().collect();
        components.sort_unstable();
        components.dedup();

        self.begin_session(&components);
        for entity in members {
            if self.is_entity_active(entity) {
                f(self, entity);
            }
        }
        self.end_session(&components);
    }

    /// Calls `f` for every entity that has `T` and is linked to `entity`.
    pub fn for_each_linked<T, F>(&mut self, entity: Entity, mut f: F)
    where
        T: Component,
        F: FnMut(&mut World, Entity),
    {
        let id = self.register::<T>();
        self.begin_session(&[id]);

        let linked = self.store::<T>(id).linked_entities(entity, &self.links);
        for other in linked {
            if self.is_entity_active(other) {
                f(self, other);
            }
        }

        self.end_session(&[id]);
    }

    /// Opens a manual session on the store of `T`.
    ///
    /// Must be balanced by [`unlock_storage`](Self::unlock_storage).
    pub fn lock_storage<T: Component>(&mut self) {
        let id = self.register::<T>();
        self.begin_session(&[id]);
    }

    /// Closes a session opened by [`lock_storage`](Self::lock_storage).
    ///
    /// # Panics
    ///
    /// Panics if the store of `T` is not locked.
    pub fn unlock_storage<T: Component>(&mut self) {
        let id = self.register::<T>();
        self.end_session(&[id]);
    }

    pub(super) fn begin_session(&mut self, components: &[ComponentId]) {
        self.iteration_depth += 1;
        for component in components {
            self.storages[component.index()].lock();
        }
    }

    pub(super) fn end_session(&mut self, components: &[ComponentId]) {
        for component in components {
            self.storages[component.index()].unlock();
        }
        for component in components {
            self.dispatch(*component);
        }

        self.iteration_depth -= 1;
        if self.iteration_depth == 0 {
            self.entities.recycle_retired();
        }
    }
}
