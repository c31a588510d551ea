use thiserror::Error;

use crate::Entity;

/// Errors returned by [`World`](crate::World) operations on entities.
///
/// Only misuse that a caller can reasonably recover from is reported here.
/// Broken preconditions inside the storage core (reading an absent component
/// straight from a store, unbalanced unlocks) panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never spawned or has already been destroyed.
    #[error("{0} is not active")]
    EntityNotActive(Entity),

    /// The entity is active but does not carry the requested component.
    #[error("{entity} has no {component} component")]
    ComponentMissing {
        /// The entity that was queried.
        entity: Entity,
        /// Type name of the missing component.
        component: &'static str,
    },
}

/// Result type for world operations.
pub type EcsResult<T> = Result<T, EcsError>;
