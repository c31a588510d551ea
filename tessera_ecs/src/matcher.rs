//! Compiled all/any/none predicates over component ids.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::component::{ComponentId, Storages};
use crate::storage::NotificationKind;
use crate::Entity;

const DEFAULT_CAPACITY: usize = 4;

const ALL_FACTOR: u64 = 393_241;
const ANY_FACTOR: u64 = 196_613;
const NONE_FACTOR: u64 = 786_433;

/// Membership change produced by re-evaluating a matcher for one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Matched,
    Unmatched,
}

/// One (store, notification side) pair a matcher has to hear about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatcherSubscription {
    pub component: ComponentId,
    pub kind: NotificationKind,
}

/// A query predicate: every `all` component present, at least one `any`
/// component present (vacuously true when `any` is empty), no `none`
/// component present.
///
/// The three id lists are kept sorted and free of duplicates, so two matchers
/// built from the same sets compare equal and hash alike no matter in which
/// order the ids were added. A matcher with no constraints at all matches
/// every entity.
///
/// # Example
/// ```
/// use tessera_ecs::{ComponentId, Matcher};
///
/// let (a, b, c) = (ComponentId::new(0), ComponentId::new(1), ComponentId::new(2));
///
/// let mut first = Matcher::new();
/// first.add_all(b);
/// first.add_all(a);
/// first.add_none(c);
///
/// let mut second = Matcher::new();
/// second.add_none(c);
/// second.add_all(a);
/// second.add_all(b);
///
/// assert_eq!(first, second);
/// assert_eq!(first.fingerprint(), second.fingerprint());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    all: Vec<ComponentId>,
    any: Vec<ComponentId>,
    none: Vec<ComponentId>,
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            all: Vec::with_capacity(DEFAULT_CAPACITY),
            any: Vec::with_capacity(DEFAULT_CAPACITY),
            none: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    pub fn add_all(&mut self, component: ComponentId) {
        insert_sorted(&mut self.all, component);
    }

    pub fn add_any(&mut self, component: ComponentId) {
        insert_sorted(&mut self.any, component);
    }

    pub fn add_none(&mut self, component: ComponentId) {
        insert_sorted(&mut self.none, component);
    }

    pub fn all(&self) -> &[ComponentId] {
        &self.all
    }

    pub fn any(&self) -> &[ComponentId] {
        &self.any
    }

    pub fn none(&self) -> &[ComponentId] {
        &self.none
    }

    pub fn is_unconstrained(&self) -> bool {
        self.all.is_empty() && self.any.is_empty() && self.none.is_empty()
    }

    /// True when an entity without any component can satisfy the matcher,
    /// i.e. `all` and `any` are both empty.
    pub fn admits_bare_entities(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Every referenced component id, role by role. Ids used in several roles
    /// appear once per role.
    pub fn components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.all
            .iter()
            .chain(self.any.iter())
            .chain(self.none.iter())
            .copied()
    }

    pub fn matches(&self, entity: Entity, storages: &Storages) -> bool {
        let has = |component: &ComponentId| storages[component.index()].has(entity);

        self.all.iter().all(has)
            && (self.any.is_empty() || self.any.iter().any(has))
            && !self.none.iter().any(has)
    }

    /// Re-evaluates the full predicate after a notification and reports the
    /// transition that brings `is_member` in line with it, if any.
    ///
    /// The notification's side is not consulted: a component can sit in
    /// several roles at once, so only the whole predicate decides.
    pub fn transition(
        &self,
        entity: Entity,
        storages: &Storages,
        is_member: bool,
    ) -> Option<Transition> {
        match (self.matches(entity, storages), is_member) {
            (true, false) => Some(Transition::Matched),
            (false, true) => Some(Transition::Unmatched),
            _ => None,
        }
    }

    /// Subscriptions needed to keep a group over this matcher current: both
    /// notification sides of every referenced component, once per component
    /// even when it appears in several roles.
    pub fn subscriptions(&self) -> Vec<MatcherSubscription> {
        let mut seen = HashSet::new();
        let mut subscriptions = Vec::new();

        for component in self.components() {
            if !seen.insert(component) {
                continue;
            }
            for kind in [NotificationKind::Added, NotificationKind::Removed] {
                subscriptions.push(MatcherSubscription { component, kind });
            }
        }

        subscriptions
    }

    /// Polynomial hash over the sorted id lists, with a distinct factor per
    /// role so that moving an id between roles changes the result.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = (self.all.len() as u64)
            .wrapping_mul(17)
            .wrapping_add((self.any.len() as u64).wrapping_mul(23))
            .wrapping_add((self.none.len() as u64).wrapping_mul(31));

        for (ids, factor) in [
            (&self.all, ALL_FACTOR),
            (&self.any, ANY_FACTOR),
            (&self.none, NONE_FACTOR),
        ] {
            for id in ids {
                hash = hash.wrapping_mul(factor).wrapping_add(id.index() as u64);
            }
        }

        hash
    }

    /// Empties the matcher so it can be pooled and reused.
    pub fn clear(&mut self) {
        self.all.clear();
        self.any.clear();
        self.none.clear();
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash for Matcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

fn insert_sorted(ids: &mut Vec<ComponentId>, component: ComponentId) {
    if let Err(position) = ids.binary_search(&component) {
        ids.insert(position, component);
    }
}
