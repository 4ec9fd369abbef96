//! Artifact persistence under the output directory.
//!
//! Writes are plain overwrites (no temp file + rename); an interrupted run can
//! leave the artifact in progress truncated. Rerunning rewrites it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::Payload;

/// Write `payload` to `path`, creating parent directories as needed.
///
/// Documents are pretty-printed JSON with a trailing newline; text is written
/// verbatim.
pub fn write_artifact(path: &Path, payload: &Payload) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create artifact dir {}", parent.display()))?;
    }
    match payload {
        Payload::Document(value) => {
            let mut buf = serde_json::to_string_pretty(value).context("serialize json")?;
            buf.push('\n');
            write_text(path, &buf)
        }
        Payload::Text(text) => write_text(path, text),
    }
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    debug!(path = %path.display(), bytes = contents.len(), "writing artifact");
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}
