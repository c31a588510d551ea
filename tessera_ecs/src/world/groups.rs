use crate::dispatch::Subscriber;
use crate::group::{Group, GroupBuilder, GroupId};
use crate::matcher::Matcher;
use crate::Entity;

use super::World;

impl World {
    /// Starts describing a group. See [`GroupBuilder`].
    pub fn group_builder(&mut self) -> GroupBuilder<'_> {
        let matcher = self.groups.acquire_matcher();
        GroupBuilder::new(self, matcher)
    }

    /// Returns the cached group for `matcher`, or builds, seeds and
    /// subscribes a new one.
    pub(crate) fn resolve_group(&mut self, matcher: Matcher) -> GroupId {
        if let Some(id) = self.groups.find(&matcher) {
            tracing::trace!(%id, "group cache hit");
            self.groups.release_matcher(matcher);
            return id;
        }

        let subscriptions = matcher.subscriptions();
        let group = Group::new(
            matcher,
            &self.entities,
            &self.storages,
            self.groups.group_capacity(),
        );
        let members = group.len();
        let id = self.groups.insert(group);

        for subscription in subscriptions {
            self.dispatcher.subscribe(
                subscription.component,
                subscription.kind,
                Subscriber::Group(id),
            );
        }

        tracing::debug!(%id, members, "group created");
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Current members of a group, sorted by id. Unknown handles yield an
    /// empty slice.
    pub fn group_entities(&mut self, id: GroupId) -> &[Entity] {
        match self.groups.get_mut(id) {
            Some(group) => group.entities(),
            None => &[],
        }
    }

    /// Members of a group linked to `entity`.
    pub fn group_linked_entities(&self, id: GroupId, entity: Entity) -> Vec<Entity> {
        self.groups
            .get(id)
            .map(|group| group.linked_entities(entity, &self.links))
            .unwrap_or_default()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
