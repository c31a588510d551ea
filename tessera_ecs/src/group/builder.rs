use crate::component::Component;
use crate::matcher::Matcher;
use crate::World;

use super::GroupId;

/// Accumulates a matcher and resolves it to a cached group.
///
/// Obtained from [`World::group_builder`]. Component types named here are
/// registered with the world on the fly.
///
/// # Example
/// ```
/// use tessera_ecs::{Component, World};
///
/// #[derive(Debug, Clone, Default)]
/// struct Position;
/// impl Component for Position {}
///
/// #[derive(Debug, Clone, Default)]
/// struct Frozen;
/// impl Component for Frozen {}
///
/// let mut world = World::new();
/// let moving = world.group_builder().all::<Position>().none::<Frozen>().build();
/// let same = world.group_builder().none::<Frozen>().all::<Position>().build();
///
/// assert_eq!(moving, same);
/// ```
pub struct GroupBuilder<'w> {
    world: &'w mut World,
    matcher: Option<Matcher>,
}

impl<'w> GroupBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, matcher: Matcher) -> Self {
        Self {
            world,
            matcher: Some(matcher),
        }
    }

    /// Requires `T` to be present.
    pub fn all<T: Component>(mut self) -> Self {
        let id = self.world.register::<T>();
        if let Some(matcher) = self.matcher.as_mut() {
            matcher.add_all(id);
        }
        self
    }

    /// Requires at least one of the `any` components to be present.
    pub fn any<T: Component>(mut self) -> Self {
        let id = self.world.register::<T>();
        if let Some(matcher) = self.matcher.as_mut() {
            matcher.add_any(id);
        }
        self
    }

    /// Requires `T` to be absent.
    pub fn none<T: Component>(mut self) -> Self {
        let id = self.world.register::<T>();
        if let Some(matcher) = self.matcher.as_mut() {
            matcher.add_none(id);
        }
        self
    }

    /// Same as [`all`](Self::all).
    pub fn include<T: Component>(self) -> Self {
        self.all::<T>()
    }

    /// Same as [`none`](Self::none).
    pub fn exclude<T: Component>(self) -> Self {
        self.none::<T>()
    }

    /// Returns the group for the accumulated matcher, creating it on first use.
    pub fn build(mut self) -> GroupId {
        let matcher = self.matcher.take().unwrap_or_default();
        self.world.resolve_group(matcher)
    }
}

impl Drop for GroupBuilder<'_> {
    fn drop(&mut self) {
        if let Some(matcher) = self.matcher.take() {
            self.world.groups.release_matcher(matcher);
        }
    }
}
