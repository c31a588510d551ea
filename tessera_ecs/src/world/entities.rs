use crate::{EcsError, EcsResult, Entity};

use super::World;

impl World {
    /// Spawns a new entity in the world.
    ///
    /// The most recently destroyed id is handed out again before any fresh
    /// one. The entity immediately joins every group whose matcher only has
    /// `none` constraints.
    ///
    /// # Example
    /// ```
    /// use tessera_ecs::World;
    ///
    /// let mut world = World::new();
    /// let entity1 = world.spawn_entity();
    /// let entity2 = world.spawn_entity();
    ///
    /// assert_ne!(entity1, entity2);
    /// assert_eq!(world.entity_count(), 2);
    /// ```
    pub fn spawn_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();

        for (_, group) in self.groups.iter_mut() {
            let matcher = group.matcher();
            if matcher.admits_bare_entities() && matcher.matches(entity, &self.storages) {
                group.insert(entity);
            }
        }

        entity
    }

    /// Destroys an entity: drops its links, every component and every group
    /// membership, then frees its id.
    ///
    /// While an iteration session is open the id is held back until the last
    /// session ends, so a removal still queued on a locked store can never hit
    /// a new owner of the same id.
    ///
    /// # Example
    /// ```
    /// use tessera_ecs::{Component, EcsError, World};
    ///
    /// #[derive(Debug, Clone, Default)]
    /// struct Position { x: f32 }
    /// impl Component for Position {}
    ///
    /// let mut world = World::new();
    /// let entity = world.spawn_entity();
    /// world.add_component::<Position>(entity).unwrap();
    ///
    /// world.destroy_entity(entity).unwrap();
    /// assert!(!world.is_entity_active(entity));
    /// assert_eq!(world.destroy_entity(entity), Err(EcsError::EntityNotActive(entity)));
    /// ```
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        let deactivated = if self.iteration_depth > 0 {
            self.entities.retire(entity)
        } else {
            self.entities.release(entity)
        };
        if !deactivated {
            return Err(EcsError::EntityNotActive(entity));
        }
        if self.iteration_depth > 0 {
            tracing::trace!(%entity, depth = self.iteration_depth, "entity retired during iteration");
        }

        self.links.unlink_all(entity);

        for index in 0..self.storages.len() {
            let store = &mut self.storages[index];
            if !store.has(entity) {
                continue;
            }
            store.remove(entity);
            let component = store.component_id();
            self.dispatch(component);
        }

        self.groups.forget(entity);
        Ok(())
    }

    pub fn is_entity_active(&self, entity: Entity) -> bool {
        self.entities.is_active(entity)
    }

    /// Active entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
