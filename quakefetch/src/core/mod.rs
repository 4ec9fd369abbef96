//! Deterministic, pure logic shared by quakefetch.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod bisect;
pub mod filename;
pub mod merge;
pub mod params;
pub mod partition;
pub mod types;
