//! Stable exit codes for the quakefetch CLI.

use crate::io::query::QueryError;

/// Query or backfill completed.
pub const OK: i32 = 0;
/// Invalid arguments or config, or a filesystem failure.
pub const INVALID: i32 = 1;
/// The catalog could not be reached, answered with an error status, or sent
/// an undecodable body.
pub const TRANSPORT: i32 = 2;
/// The catalog rejected a request that could not be narrowed further.
pub const LIMIT_EXCEEDED: i32 = 3;

/// Exit code for an error that reached the top level.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<QueryError>() {
        Some(QueryError::LimitExceeded { .. }) => LIMIT_EXCEEDED,
        Some(_) => TRANSPORT,
        None => INVALID,
    }
}
