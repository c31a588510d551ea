use crate::links::LinkGraph;
use crate::{EcsError, EcsResult, Entity};

use super::World;

impl World {
    /// Links two active entities. Links are symmetric and carry no data.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] naming the first inactive entity.
    pub fn link(&mut self, a: Entity, b: Entity) -> EcsResult<()> {
        for entity in [a, b] {
            if !self.is_entity_active(entity) {
                return Err(EcsError::EntityNotActive(entity));
            }
        }
        self.links.link(a, b);
        Ok(())
    }

    pub fn unlink(&mut self, a: Entity, b: Entity) {
        self.links.unlink(a, b);
    }

    pub fn unlink_all(&mut self, entity: Entity) {
        self.links.unlink_all(entity);
    }

    pub fn has_link(&self, a: Entity, b: Entity) -> bool {
        self.links.has_link(a, b)
    }

    pub fn links(&self) -> &LinkGraph {
        &self.links
    }
}
