//! I/O helpers for quakefetch commands.

pub mod artifact;
pub mod config;
pub mod query;
pub mod session;
