use std::collections::HashMap;

use crate::matcher::Matcher;
use crate::Entity;

use super::{Group, GroupId};

/// Flyweight cache of groups keyed by matcher identity.
///
/// Groups are never evicted; a [`GroupId`] handed out once stays valid for
/// the lifetime of the registry. Matchers that turn out to duplicate a cached
/// one go back to a pool for the next builder.
#[derive(Debug)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    index: HashMap<Matcher, GroupId>,
    matcher_pool: Vec<Matcher>,
    group_capacity: usize,
}

impl GroupRegistry {
    pub fn new(group_capacity: usize) -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
            matcher_pool: Vec::new(),
            group_capacity: group_capacity.max(1),
        }
    }

    /// Capacity used to seed the membership set of new groups.
    pub fn group_capacity(&self) -> usize {
        self.group_capacity
    }

    /// An empty matcher, recycled from the pool when possible.
    pub fn acquire_matcher(&mut self) -> Matcher {
        self.matcher_pool.pop().unwrap_or_default()
    }

    pub fn release_matcher(&mut self, mut matcher: Matcher) {
        matcher.clear();
        self.matcher_pool.push(matcher);
    }

    pub fn pooled_matchers(&self) -> usize {
        self.matcher_pool.len()
    }

    pub fn find(&self, matcher: &Matcher) -> Option<GroupId> {
        self.index.get(matcher).copied()
    }

    /// Caches `group` under its matcher and returns its handle.
    pub fn insert(&mut self, group: Group) -> GroupId {
        let id = GroupId::new(self.groups.len());
        self.index.insert(group.matcher().clone(), id);
        self.groups.push(group);
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| (GroupId::new(index), group))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GroupId, &mut Group)> {
        self.groups
            .iter_mut()
            .enumerate()
            .map(|(index, group)| (GroupId::new(index), group))
    }

    /// Drops `entity` from every group.
    pub fn forget(&mut self, entity: Entity) {
        for group in &mut self.groups {
            group.remove(entity);
        }
    }

    /// Empties every group but keeps the groups and their handles.
    pub fn clear_members(&mut self) {
        self.groups.iter_mut().for_each(Group::clear);
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CAPACITY)
    }
}
