use std::any::type_name;

use crate::{Component, EcsError, EcsResult, Entity};

use super::World;

impl World {
    /// Attaches a default `T` to `entity` and returns it for in-place
    /// initialization.
    ///
    /// Adding a component the entity already has is not an error: the
    /// existing value is returned untouched. Groups referencing `T` are
    /// updated before this returns, unless the store is locked by an open
    /// iteration session.
    ///
    /// Inside a session, adding back a component removed earlier in the same
    /// session cancels the queued removal; the returned slot is reset to
    /// `T::default()` and survives the end of the session.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] if the entity was never spawned
    /// or has been destroyed.
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
    ///
    /// // A second add hands back the same component
    /// assert_eq!(world.add_component::<Position>(entity).unwrap().x, 10.0);
    /// ```
    pub fn add_component<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        if !self.is_entity_active(entity) {
            return Err(EcsError::EntityNotActive(entity));
        }

        let id = self.register::<T>();
        self.store_mut::<T>(id).add(entity);
        self.dispatch(id);

        Ok(self.store_mut::<T>(id).get_mut(entity))
    }

    /// Returns the component of an active entity, if it has one.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_entity_active(entity) {
            return None;
        }
        self.get_storage::<T>()?.try_get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_entity_active(entity) {
            return None;
        }
        self.get_storage_mut::<T>()?.try_get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Detaches `T` from `entity`. Returns whether the entity had it.
    ///
    /// Inside an iteration session over `T` the removal is queued and applied
    /// when the session ends.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> bool {
        let Some(id) = self.component_id::<T>() else {
            return false;
        };

        let store = self.store_mut::<T>(id);
        if !store.has(entity) {
            return false;
        }
        store.remove(entity);
        self.dispatch(id);
        true
    }

    /// Mutates a component in place through `f`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] for inactive entities and
    /// [`EcsError::ComponentMissing`] when the entity has no `T`.
    ///
    /// # Example
    /// ```
    /// use tessera_ecs::{Component, World};
    ///
    /// #[derive(Debug, Clone, Default, PartialEq)]
    /// struct Health { value: u32 }
    /// impl Component for Health {}
    ///
    /// let mut world = World::new();
    /// let entity = world.spawn_entity();
    /// world.add_component::<Health>(entity).unwrap().value = 100;
    ///
    /// world.update_component::<Health>(entity, |health| health.value -= 30).unwrap();
    /// assert_eq!(world.get_component::<Health>(entity).unwrap().value, 70);
    /// ```
    pub fn update_component<T: Component>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T),
    ) -> EcsResult<()> {
        if !self.is_entity_active(entity) {
            return Err(EcsError::EntityNotActive(entity));
        }

        let component = self
            .get_storage_mut::<T>()
            .and_then(|store| store.try_get_mut(entity))
            .ok_or(EcsError::ComponentMissing {
                entity,
                component: type_name::<T>(),
            })?;
        f(component);
        Ok(())
    }
}
