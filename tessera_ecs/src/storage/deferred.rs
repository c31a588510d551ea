use crate::Entity;

/// Structural operations raised against a locked store.
///
/// Additions only defer their notification (the slot is written straight
/// away); removals defer everything. Both queues are replayed FIFO when the
/// last lock is released, additions first.
#[derive(Debug, Default)]
pub struct DeferredOps {
    added: Vec<Entity>,
    removed: Vec<Entity>,
}

impl DeferredOps {
    pub fn defer_add(&mut self, entity: Entity) {
        self.added.push(entity);
    }

    pub fn defer_remove(&mut self, entity: Entity) {
        self.removed.push(entity);
    }

    /// Drops every queued removal of `entity`. Returns whether one was queued.
    pub fn cancel_remove(&mut self, entity: Entity) -> bool {
        let before = self.removed.len();
        self.removed.retain(|queued| *queued != entity);
        self.removed.len() != before
    }

    /// Entities whose "added" notification is still pending.
    pub fn added(&self) -> &[Entity] {
        &self.added
    }

    /// Entities whose removal has not been applied yet.
    pub fn removed(&self) -> &[Entity] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }
}
