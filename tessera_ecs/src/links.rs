use std::collections::HashSet;

use crate::storage::grown_capacity;
use crate::Entity;

/// Symmetric adjacency between entities.
///
/// Links carry no data; stores and groups only use them as a filter
/// ("entities linked to `e`").
#[derive(Debug, Default)]
pub struct LinkGraph {
    links: Vec<HashSet<Entity>>,
}

impl LinkGraph {
    pub fn new(capacity: usize) -> Self {
        Self {
            links: (0..capacity).map(|_| HashSet::new()).collect(),
        }
    }

    pub fn link(&mut self, a: Entity, b: Entity) {
        self.links_mut(a).insert(b);
        self.links_mut(b).insert(a);
    }

    pub fn unlink(&mut self, a: Entity, b: Entity) {
        if let Some(links) = self.links.get_mut(a.index()) {
            links.remove(&b);
        }
        if let Some(links) = self.links.get_mut(b.index()) {
            links.remove(&a);
        }
    }

    /// Removes every link touching `entity`, on both ends.
    pub fn unlink_all(&mut self, entity: Entity) {
        let Some(links) = self.links.get_mut(entity.index()) else {
            return;
        };
        let peers = std::mem::take(links);
        for peer in peers {
            if let Some(links) = self.links.get_mut(peer.index()) {
                links.remove(&entity);
            }
        }
    }

    pub fn has_link(&self, a: Entity, b: Entity) -> bool {
        self.links
            .get(a.index())
            .is_some_and(|links| links.contains(&b))
    }

    pub fn links_of(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.links.get(entity.index()).into_iter().flatten().copied()
    }

    pub fn clear(&mut self) {
        self.links.iter_mut().for_each(HashSet::clear);
    }

    fn links_mut(&mut self, entity: Entity) -> &mut HashSet<Entity> {
        let index = entity.index();
        if index >= self.links.len() {
            let len = grown_capacity(self.links.len(), index);
            self.links.resize_with(len, HashSet::new);
        }
        &mut self.links[index]
    }
}
