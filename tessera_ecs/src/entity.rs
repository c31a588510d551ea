use std::fmt;

use crate::storage::grown_capacity;

/// A dense, recyclable identifier for entities in the ECS system.
///
/// Entities carry no data of their own. They are plain indices into the
/// sparse arrays of every component store, which is why ids are recycled
/// instead of growing without bound.
///
/// # Examples
///
/// ```
/// use tessera_ecs::World;
///
/// let mut world = World::new();
/// let player = world.spawn_entity();
/// let monster = world.spawn_entity();
///
/// assert_ne!(player, monster);
/// assert_eq!(player.id(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Wraps a raw id. Intended for tests and for stores used outside a `World`.
    pub const fn from_raw(id: u32) -> Entity {
        Entity { id }
    }

    /// Returns the raw integer id.
    pub const fn id(self) -> u32 {
        self.id
    }

    pub(crate) const fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity [{}]", self.id)
    }
}

/// Allocates entity ids and recycles freed ones.
///
/// Freed ids go on a LIFO free list, so the most recently destroyed id is the
/// next one handed out. Ids destroyed while an iteration session is open are
/// *retired* instead: they stay unusable until [`EntityTable::recycle_retired`]
/// runs, which keeps a deferred component removal from landing on a new owner.
#[derive(Debug)]
pub struct EntityTable {
    active: Vec<bool>,
    free: Vec<u32>,
    retired: Vec<u32>,
    next_id: u32,
    active_count: usize,
}

impl EntityTable {
    /// Creates a table whose activity array is seeded with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            active: vec![false; capacity.max(1)],
            free: Vec::new(),
            retired: Vec::new(),
            next_id: 0,
            active_count: 0,
        }
    }

    /// Hands out a recycled id if one is free, otherwise the next fresh id.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted.
    pub fn allocate(&mut self) -> Entity {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id = id.checked_add(1).expect("entity id space exhausted");
                id
            }
        };

        let index = id as usize;
        if index >= self.active.len() {
            let len = grown_capacity(self.active.len(), index);
            self.active.resize(len, false);
        }

        self.active[index] = true;
        self.active_count += 1;
        Entity::from_raw(id)
    }

    /// Deactivates `entity` and makes its id immediately reusable.
    ///
    /// Returns `false` if the entity was not active.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.deactivate(entity) {
            return false;
        }
        self.free.push(entity.id());
        true
    }

    /// Deactivates `entity` but holds its id back until [`recycle_retired`](Self::recycle_retired).
    pub fn retire(&mut self, entity: Entity) -> bool {
        if !self.deactivate(entity) {
            return false;
        }
        self.retired.push(entity.id());
        true
    }

    /// Moves every retired id onto the free list, preserving LIFO reuse order.
    pub fn recycle_retired(&mut self) {
        if self.retired.is_empty() {
            return;
        }
        tracing::trace!(count = self.retired.len(), "recycling retired entity ids");
        self.free.append(&mut self.retired);
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.get(entity.index()).copied().unwrap_or(false)
    }

    /// Iterates active entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.active
            .iter()
            .take(self.next_id as usize)
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(index, _)| Entity::from_raw(index as u32))
    }

    pub fn len(&self) -> usize {
        self.active_count
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    /// Forgets every entity. The next allocation starts again from id 0.
    pub fn clear(&mut self) {
        self.active.fill(false);
        self.free.clear();
        self.retired.clear();
        self.next_id = 0;
        self.active_count = 0;
    }

    fn deactivate(&mut self, entity: Entity) -> bool {
        match self.active.get_mut(entity.index()) {
            Some(active) if *active => {
                *active = false;
                self.active_count -= 1;
                true
            }
            _ => false,
        }
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CAPACITY)
    }
}
