//! Earthquake catalog retrieval.
//!
//! Fetches event records from the USGS FDSN event service, either as a single
//! parameterized query or as a monthly backfill that works around the
//! service's per-request result cap. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (month partitioning, bisection,
//!   CSV merging, parameters, file names). No I/O.
//! - **[`io`]**: Side-effecting operations (HTTP session, request
//!   classification, artifact writes, config).
//!
//! Orchestration modules ([`backfill`], [`fetch`]) combine the two to
//! implement the CLI.

pub mod backfill;
pub mod cli;
pub mod core;
pub mod exit_codes;
pub mod fetch;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
