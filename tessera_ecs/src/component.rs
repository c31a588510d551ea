use std::any::Any;
use std::fmt;

use crate::storage::Notification;
use crate::Entity;

/// A marker trait for component types in the ECS system.
///
/// Components are plain data attached to at most one entity per type. Stores
/// hand out default-constructed slots that callers fill in place, so every
/// component must implement [`Default`].
///
/// # Examples
///
/// ```
/// use tessera_ecs::Component;
///
/// #[derive(Debug, Clone, Default)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Default + 'static {}

/// Dense index of a component type inside one [`World`](crate::World).
///
/// Ids are assigned in registration order, starting at 0, and are what
/// matchers and subscriptions refer to instead of `TypeId`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component #{}", self.0)
    }
}

/// Every registered store of a world, indexed by [`ComponentId`].
pub type Storages = [Box<dyn AnyStorage>];

/// Type-erased view of a [`ComponentStore`](crate::ComponentStore).
///
/// The world keeps one boxed store per component type and reaches the
/// structural operations (membership tests, removal, locking, notification
/// draining) through this trait without knowing the concrete type.
pub trait AnyStorage: Any {
    fn component_id(&self) -> ComponentId;

    fn component_type_name(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has(&self, entity: Entity) -> bool;

    fn remove(&mut self, entity: Entity);

    fn lock(&mut self);

    fn unlock(&mut self);

    fn is_locked(&self) -> bool;

    /// Exchanges the store's pending notifications with `buffer`.
    ///
    /// `buffer` must be empty on entry; afterwards it holds every notification
    /// raised since the previous swap, in the order they were raised.
    fn swap_notifications(&mut self, buffer: &mut Vec<Notification>);

    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
