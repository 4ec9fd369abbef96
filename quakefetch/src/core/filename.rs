//! Deterministic artifact file names.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::params::{ENDTIME, MINMAGNITUDE, QueryParams, STARTTIME};
use crate::core::types::Format;

/// Backfill artifact for the month starting at `month_start`: `YYYYMMDD.csv`.
pub fn month_artifact_path(output_dir: &Path, month_start: NaiveDate) -> PathBuf {
    output_dir.join(format!(
        "{}.{}",
        month_start.format("%Y%m%d"),
        Format::Csv.as_str()
    ))
}

/// One-shot artifact named from the time/magnitude filters and `generated_at`.
///
/// `earthquakes_start_<t>_end_<t>_minmag_<m>_<YYYYMMDD_HHMMSS>.<format>`, with
/// absent filters left out.
pub fn query_artifact_path(
    output_dir: &Path,
    params: &QueryParams,
    generated_at: DateTime<Utc>,
) -> PathBuf {
    let mut parts = Vec::new();
    if let Some(start) = params.get(STARTTIME) {
        parts.push(format!("start_{}", compact_time(start)));
    }
    if let Some(end) = params.get(ENDTIME) {
        parts.push(format!("end_{}", compact_time(end)));
    }
    if let Some(minmag) = params.get(MINMAGNITUDE) {
        parts.push(format!("minmag_{minmag}"));
    }
    parts.push(generated_at.format("%Y%m%d_%H%M%S").to_string());

    output_dir.join(format!(
        "earthquakes_{}.{}",
        parts.join("_"),
        params.format().as_str()
    ))
}

fn compact_time(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && *c != ':')
        .map(|c| if c == 'T' { '_' } else { c })
        .collect()
}
