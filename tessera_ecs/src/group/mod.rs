//! Incrementally maintained entity sets, one per distinct matcher.

use std::collections::HashSet;
use std::fmt;

use crate::component::Storages;
use crate::links::LinkGraph;
use crate::matcher::{Matcher, Transition};
use crate::{Entity, EntityTable};

mod builder;
mod registry;

pub use builder::GroupBuilder;
pub use registry::GroupRegistry;

/// Handle to a group owned by a [`World`](crate::World).
///
/// Handles stay valid for the lifetime of the world, including across
/// [`World::clear`](crate::World::clear).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

/// The set of entities currently satisfying one [`Matcher`].
///
/// Membership is seeded by a single scan on construction and afterwards only
/// changes through [`Transition`]s raised by store notifications. Reads go
/// through a snapshot sorted by entity id, rebuilt lazily after the
/// membership changed.
#[derive(Debug)]
pub struct Group {
    matcher: Matcher,
    members: HashSet<Entity>,
    snapshot: Vec<Entity>,
    snapshot_valid: bool,
}

impl Group {
    /// Builds the group and seeds it with every active entity that matches.
    pub fn new(
        matcher: Matcher,
        entities: &EntityTable,
        storages: &Storages,
        capacity: usize,
    ) -> Self {
        let mut members = HashSet::with_capacity(capacity);
        members.extend(
            entities
                .iter()
                .filter(|entity| matcher.matches(*entity, storages)),
        );

        Self {
            matcher,
            members,
            snapshot: Vec::new(),
            snapshot_valid: false,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    /// Members sorted by id. Repeated reads return the same buffer until the
    /// membership changes.
    pub fn entities(&mut self) -> &[Entity] {
        if !self.snapshot_valid {
            self.snapshot.clear();
            self.snapshot.extend(self.members.iter().copied());
            self.snapshot.sort_unstable();
            self.snapshot_valid = true;
        }
        &self.snapshot
    }

    /// Member at `index` in snapshot order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&mut self, index: usize) -> Entity {
        let len = self.len();
        match self.entities().get(index) {
            Some(entity) => *entity,
            None => panic!("group index {index} out of range for {len} members"),
        }
    }

    /// Members linked to `entity`, sorted by id. Recomputed on every call.
    pub fn linked_entities(&self, entity: Entity, links: &LinkGraph) -> Vec<Entity> {
        let mut linked: Vec<_> = self
            .members
            .iter()
            .copied()
            .filter(|member| links.has_link(entity, *member))
            .collect();
        linked.sort_unstable();
        linked
    }

    /// Applies a membership transition. Returns whether membership changed.
    pub(crate) fn apply(&mut self, transition: Transition, entity: Entity) -> bool {
        match transition {
            Transition::Matched => self.insert(entity),
            Transition::Unmatched => self.remove(entity),
        }
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> bool {
        let inserted = self.members.insert(entity);
        self.snapshot_valid &= !inserted;
        inserted
    }

    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        let removed = self.members.remove(&entity);
        self.snapshot_valid &= !removed;
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
        self.snapshot.clear();
        self.snapshot_valid = false;
    }
}
