/// Capacity used for every seed when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 32;

/// Initial sizing for a [`World`](crate::World).
///
/// Every value is only a seed: entity tables, sparse indices, dense arrays and
/// group sets all double on demand, so a small configuration never limits how
/// many entities or components the world can hold.
///
/// # Example
/// ```
/// use tessera_ecs::{World, WorldConfig};
///
/// let config = WorldConfig::default()
///     .with_entity_capacity(1024)
///     .with_component_capacity(256);
/// let world = World::with_config(config);
///
/// assert_eq!(world.config().entity_capacity, 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Seeds the entity table and the sparse index of each component store.
    pub entity_capacity: usize,
    /// Seeds the dense arrays of each component store on its first add.
    pub component_capacity: usize,
    /// Seeds the membership set of each group.
    pub group_capacity: usize,
}

impl WorldConfig {
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity.max(1);
        self
    }

    pub fn with_component_capacity(mut self, capacity: usize) -> Self {
        self.component_capacity = capacity.max(1);
        self
    }

    pub fn with_group_capacity(mut self, capacity: usize) -> Self {
        self.group_capacity = capacity.max(1);
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_capacity: DEFAULT_CAPACITY,
            component_capacity: DEFAULT_CAPACITY,
            group_capacity: DEFAULT_CAPACITY,
        }
    }
}
