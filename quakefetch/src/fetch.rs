//! One-shot catalog query written to a single artifact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::core::filename::query_artifact_path;
use crate::core::params::QueryParams;
use crate::io::artifact::write_artifact;
use crate::io::query::execute;
use crate::io::session::HttpSession;

/// Inputs for a one-shot query.
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    pub base_url: &'a str,
    pub params: &'a QueryParams,
    /// Explicit artifact path; when absent a name is derived from the filters.
    pub output: Option<&'a Path>,
    pub output_dir: &'a Path,
}

/// Issue the query and write its body.
///
/// Over-limit rejections are not split here; they surface as
/// [`crate::io::query::QueryError::LimitExceeded`].
#[instrument(skip_all, fields(format = %request.params.format()))]
pub fn run_fetch<S: HttpSession + ?Sized>(
    session: &S,
    request: &FetchRequest<'_>,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let payload = execute(request.base_url, request.params, session).context("query catalog")?;
    let path = match request.output {
        Some(path) => path.to_path_buf(),
        None => query_artifact_path(request.output_dir, request.params, generated_at),
    };
    write_artifact(&path, &payload)?;
    info!(path = %path.display(), "query saved");
    Ok(path)
}
