//! Sparse-set entity component storage with incrementally maintained groups
//! and snapshot-based change detection.
//!
//! # Example
//! ```
//! use tessera_ecs::{Component, World};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct A;
//! impl Component for A {}
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct B;
//! impl Component for B {}
//!
//! let mut world = World::new();
//! let e: Vec<_> = (0..5).map(|_| world.spawn_entity()).collect();
//! for entity in [e[0], e[2], e[4]] {
//!     world.add_component::<A>(entity).unwrap();
//! }
//! for entity in [e[1], e[3]] {
//!     world.add_component::<B>(entity).unwrap();
//! }
//!
//! let with_a = world.group_builder().all::<A>().build();
//! let without_a = world.group_builder().none::<A>().build();
//!
//! assert_eq!(world.group_entities(with_a), &[e[0], e[2], e[4]]);
//! assert_eq!(world.group_entities(without_a), &[e[1], e[3]]);
//! ```

pub mod component;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod group;
pub mod links;
pub mod matcher;
pub mod reactive;
pub mod storage;
pub mod system;
pub mod world;

// Re-export commonly used types
pub use component::{AnyStorage, Component, ComponentId, Storages};
pub use config::WorldConfig;
pub use entity::{Entity, EntityTable};
pub use error::{EcsError, EcsResult};
pub use group::{Group, GroupBuilder, GroupId, GroupRegistry};
pub use links::LinkGraph;
pub use matcher::Matcher;
pub use reactive::{Reactive, ReactiveStore};
pub use storage::{ComponentStore, DeferredOps, Notification, NotificationKind, StoreSnapshot};
pub use system::{Feature, System};
pub use world::World;
