//! Core Integration Tests
//!
//! Tests for fundamental operations including:
//! - Entity lifecycle and id recycling
//! - Component add/get/remove through the world
//! - Deferred operations during iteration sessions

pub mod component_lifecycle;
pub mod deferred_operations;
pub mod entity_lifecycle;
