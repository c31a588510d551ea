//! Scenario Integration Tests
//!
//! Small simulations exercising groups, sessions, links and reactive
//! tracking together.

pub mod simulation;
