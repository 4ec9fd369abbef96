//! Single catalog request: send, classify, decode.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::params::{CALLBACK, QueryParams};
use crate::core::types::{Format, Payload};
use crate::io::session::{HttpResponse, HttpSession};

/// Status the catalog uses to reject over-limit searches.
pub const LIMIT_EXCEEDED_STATUS: u16 = 400;
/// Phrase in the rejection body that identifies the result-count cap.
pub const LIMIT_EXCEEDED_PHRASE: &str = "exceeds search limit";

/// Classified failure of one catalog request.
///
/// Only [`QueryError::LimitExceeded`] is recoverable (by narrowing the time
/// window); every other variant is fatal for the run.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query limit exceeded: {body}")]
    LimitExceeded { body: String },

    #[error("request error: {message}")]
    Transport { message: String },

    #[error("HTTP error: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode {format} response: {source}")]
    Decode {
        format: Format,
        #[source]
        source: serde_json::Error,
    },
}

impl QueryError {
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, QueryError::LimitExceeded { .. })
    }
}

/// Issue one GET against `base_url` and decode the body for `params.format()`.
#[instrument(skip_all, fields(format = %params.format()))]
pub fn execute<S: HttpSession + ?Sized>(
    base_url: &str,
    params: &QueryParams,
    session: &S,
) -> Result<Payload, QueryError> {
    let pairs = params.to_pairs();
    debug!(base_url, params = ?pairs, "catalog request");
    let response = session.get(base_url, &pairs)?;
    classify(params, response)
}

fn classify(params: &QueryParams, response: HttpResponse) -> Result<Payload, QueryError> {
    let HttpResponse { status, body } = response;
    if (200..300).contains(&status) {
        return decode(params, body);
    }
    let body = body.trim().to_string();
    if status == LIMIT_EXCEEDED_STATUS && body.contains(LIMIT_EXCEEDED_PHRASE) {
        warn!(status, "catalog search limit exceeded");
        return Err(QueryError::LimitExceeded { body });
    }
    warn!(status, "catalog request failed");
    Err(QueryError::Status { status, body })
}

fn decode(params: &QueryParams, body: String) -> Result<Payload, QueryError> {
    let format = params.format();
    // `callback` wraps geojson in JSONP; `nodata=204` yields an empty body.
    let structured = format.is_structured() && params.get(CALLBACK).is_none();
    if !structured || body.is_empty() {
        return Ok(Payload::Text(body));
    }
    serde_json::from_str(&body)
        .map(Payload::Document)
        .map_err(|source| QueryError::Decode { format, source })
}
