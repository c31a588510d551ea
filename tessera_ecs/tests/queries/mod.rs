//! Group Integration Tests
//!
//! Tests for matcher semantics, incremental group maintenance and the
//! flyweight group cache.
