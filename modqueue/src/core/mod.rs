//! Deterministic, pure logic shared by the report aggregator.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod merge;
pub mod normalize;
pub mod patch;
pub mod request_state;
pub mod store;
pub mod types;
pub mod views;
