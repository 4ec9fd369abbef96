//! Diagnostic tracing for quakefetch.
//!
//! # What is traced
//!
//! - `info`: each month queried and saved, with its request and split counts.
//! - `debug`: every catalog request (`format`, encoded params), every response
//!   (`status`, `bytes`), and each bisection of an over-limit range (`depth`
//!   plus the two halves).
//! - `warn`: rejected or failed requests, and single days still over the limit.
//!
//! Progress lines on stdout come from `main` and do not depend on `RUST_LOG`.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber.
///
/// `RUST_LOG` directives apply on top of a `warn` default; unparsable
/// directives are skipped rather than failing startup. Events carry their
/// span fields (`url`, `format`) but not module targets.
///
/// # Example
/// ```bash
/// RUST_LOG=quakefetch=debug quakefetch --monthly --starttime 2024-01-01
/// ```
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::registry()
        .with(build_filter(&directives))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}
