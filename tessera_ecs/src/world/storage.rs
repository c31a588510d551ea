use std::any::{type_name, TypeId};

use crate::{Component, ComponentId, ComponentStore};

use super::World;

impl World {
    /// Registers `T` and returns its id. Registering twice returns the same id.
    ///
    /// Stores are otherwise created lazily by the first operation naming `T`.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(id) = self.component_ids.get(&type_id) {
            return *id;
        }

        let index = u32::try_from(self.storages.len()).expect("component id space exhausted");
        let id = ComponentId::new(index);
        self.storages.push(Box::new(ComponentStore::<T>::new(
            id,
            self.config.entity_capacity,
            self.config.component_capacity,
        )));
        self.component_ids.insert(type_id, id);

        tracing::debug!(component = type_name::<T>(), %id, "component store registered");
        id
    }

    /// The store for `T`, created on first request.
    ///
    /// Direct access is read-only; structural changes go through the world so
    /// groups and trackers are notified.
    pub fn storage<T: Component>(&mut self) -> &ComponentStore<T> {
        let id = self.register::<T>();
        self.store::<T>(id)
    }

    /// The id of `T`, if it has been registered.
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.component_ids.get(&TypeId::of::<T>()).copied()
    }

    /// Gets the store for `T` without creating it.
    pub fn get_storage<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let id = self.component_id::<T>()?;
        Some(self.store::<T>(id))
    }

    pub(crate) fn get_storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let id = self.component_id::<T>()?;
        Some(self.store_mut::<T>(id))
    }

    pub(super) fn store<T: Component>(&self, id: ComponentId) -> &ComponentStore<T> {
        self.storages[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .expect("Failed to downcast storage for component type")
    }

    pub(super) fn store_mut<T: Component>(&mut self, id: ComponentId) -> &mut ComponentStore<T> {
        self.storages[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .expect("Failed to downcast storage for component type")
    }
}
