//! Monthly backfill: one CSV artifact per calendar month.
//!
//! Each month is queried as a whole first. When the catalog rejects the window
//! for matching too many events, the window is bisected and each half fetched
//! on its own, recursively, down to a single day. Half results are stitched
//! back together in chronological order before the month's artifact is
//! written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::core::bisect::bisect;
use crate::core::filename::month_artifact_path;
use crate::core::merge::merge_tabular;
use crate::core::params::QueryParams;
use crate::core::partition::partition;
use crate::core::types::{DateRange, Format, Payload};
use crate::io::artifact::write_artifact;
use crate::io::query::{QueryError, execute};
use crate::io::session::HttpSession;

/// Inputs for a backfill run.
#[derive(Debug, Clone)]
pub struct BackfillRequest<'a> {
    pub base_url: &'a str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Filters applied to every request. `format` is always replaced by CSV
    /// and the time bounds by the month being fetched.
    pub extra_params: &'a QueryParams,
    pub output_dir: &'a Path,
}

/// A month whose artifact was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReport {
    pub range: DateRange,
    pub path: PathBuf,
    /// Requests issued for this month, including bisected sub-requests.
    pub requests: u32,
    /// Times an over-limit window was split in two.
    pub splits: u32,
}

/// Summary of a completed backfill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackfillOutcome {
    pub months: Vec<MonthReport>,
}

impl BackfillOutcome {
    pub fn total_requests(&self) -> u32 {
        self.months.iter().map(|month| month.requests).sum()
    }
}

#[derive(Debug, Default)]
struct FetchStats {
    requests: u32,
    splits: u32,
}

/// Fetch and persist every month in `[request.start, request.end]`, in order.
///
/// `on_month` is called after each artifact is written. Any error other than
/// a splittable limit rejection stops the run; artifacts already written are
/// left in place.
#[instrument(skip_all, fields(start = %request.start, end = %request.end))]
pub fn run_backfill<S: HttpSession + ?Sized, F: FnMut(&MonthReport)>(
    session: &S,
    request: &BackfillRequest<'_>,
    mut on_month: F,
) -> Result<BackfillOutcome> {
    let template = request.extra_params.clone().with_format(Format::Csv);
    let mut outcome = BackfillOutcome::default();

    for month in partition(request.start, request.end) {
        info!(%month, "querying month");
        let mut stats = FetchStats::default();
        let body = fetch_range(session, request.base_url, &template, month, &mut stats, 0)
            .with_context(|| format!("query month {month}"))?;

        let path = month_artifact_path(request.output_dir, month.start);
        write_artifact(&path, &Payload::Text(body))?;

        let report = MonthReport {
            range: month,
            path,
            requests: stats.requests,
            splits: stats.splits,
        };
        info!(
            %month,
            path = %report.path.display(),
            requests = report.requests,
            splits = report.splits,
            "month saved"
        );
        on_month(&report);
        outcome.months.push(report);
    }

    Ok(outcome)
}

/// Fetch `range`, splitting it while the catalog reports the search limit.
fn fetch_range<S: HttpSession + ?Sized>(
    session: &S,
    base_url: &str,
    template: &QueryParams,
    range: DateRange,
    stats: &mut FetchStats,
    depth: u32,
) -> Result<String, QueryError> {
    stats.requests += 1;
    let params = template.clone().with_range(range);
    let err = match execute(base_url, &params, session) {
        Ok(payload) => return Ok(payload_text(payload)),
        Err(err) if err.is_limit_exceeded() => err,
        Err(err) => return Err(err),
    };

    let Some((first, second)) = bisect(range) else {
        warn!(%range, "single day exceeds search limit; cannot split further");
        return Err(err);
    };
    stats.splits += 1;
    debug!(%range, days = range.days(), %first, %second, depth, "bisecting over-limit range");

    let head = fetch_range(session, base_url, template, first, stats, depth + 1)?;
    let tail = fetch_range(session, base_url, template, second, stats, depth + 1)?;
    Ok(merge_tabular(&head, &tail))
}

fn payload_text(payload: Payload) -> String {
    match payload {
        Payload::Text(text) => text,
        Payload::Document(doc) => doc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CSV_HEADER, ScriptedSession, csv_body};
    use std::fs;

    const URL: &str = "https://catalog.test/query";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn request<'a>(
        start: NaiveDate,
        end: NaiveDate,
        extra_params: &'a QueryParams,
        output_dir: &'a Path,
    ) -> BackfillRequest<'a> {
        BackfillRequest {
            base_url: URL,
            start,
            end,
            extra_params,
            output_dir,
        }
    }

    #[test]
    fn writes_one_artifact_per_month() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut extra = QueryParams::new(Format::Geojson);
        extra.set("minmagnitude", 4.5);
        let session = ScriptedSession::new(vec![
            ScriptedSession::ok(&csv_body(&["jan"])),
            ScriptedSession::ok(&csv_body(&["feb"])),
            ScriptedSession::ok(&csv_body(&["mar"])),
        ]);

        let mut seen = Vec::new();
        let outcome = run_backfill(
            &session,
            &request(date(2024, 1, 15), date(2024, 3, 10), &extra, temp.path()),
            |month| seen.push(month.range),
        )
        .expect("backfill");

        assert_eq!(outcome.months.len(), 3);
        assert_eq!(outcome.total_requests(), 3);
        assert_eq!(seen.len(), 3);
        assert_eq!(
            fs::read_to_string(temp.path().join("20240201.csv")).expect("read"),
            csv_body(&["feb"])
        );
        assert!(temp.path().join("20240115.csv").is_file());
        assert!(temp.path().join("20240301.csv").is_file());

        let requests = session.requests();
        assert_eq!(requests[0].param("format"), Some("csv"));
        assert_eq!(requests[0].param("minmagnitude"), Some("4.5"));
        assert_eq!(requests[0].param("starttime"), Some("2024-01-15"));
        assert_eq!(requests[0].param("endtime"), Some("2024-01-31"));
        assert_eq!(requests[2].param("starttime"), Some("2024-03-01"));
        assert_eq!(requests[2].param("endtime"), Some("2024-03-10"));
    }

    #[test]
    fn over_limit_month_is_split_once_and_merged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(vec![
            ScriptedSession::limit_exceeded(),
            ScriptedSession::ok(&csv_body(&["a1", "a2"])),
            ScriptedSession::ok(&csv_body(&["b1"])),
        ]);

        let outcome = run_backfill(
            &session,
            &request(date(2024, 1, 1), date(2024, 1, 31), &extra, temp.path()),
            |_| {},
        )
        .expect("backfill");

        let requests = session.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].param("starttime"), Some("2024-01-01"));
        assert_eq!(requests[1].param("endtime"), Some("2024-01-16"));
        assert_eq!(requests[2].param("starttime"), Some("2024-01-17"));
        assert_eq!(requests[2].param("endtime"), Some("2024-01-31"));

        assert_eq!(outcome.months[0].requests, 3);
        assert_eq!(outcome.months[0].splits, 1);

        let contents = fs::read_to_string(temp.path().join("20240101.csv")).expect("read");
        assert_eq!(contents.matches(CSV_HEADER).count(), 1);
        assert_eq!(contents, csv_body(&["a1", "a2", "b1"]));
    }

    #[test]
    fn over_limit_half_is_split_again() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(vec![
            ScriptedSession::limit_exceeded(),
            ScriptedSession::limit_exceeded(),
            ScriptedSession::ok(&csv_body(&["q1"])),
            ScriptedSession::ok(&csv_body(&["q2"])),
            ScriptedSession::ok(&csv_body(&["h2"])),
        ]);

        let outcome = run_backfill(
            &session,
            &request(date(2024, 1, 1), date(2024, 1, 31), &extra, temp.path()),
            |_| {},
        )
        .expect("backfill");

        let bounds: Vec<_> = session
            .requests()
            .iter()
            .map(|req| {
                (
                    req.param("starttime").unwrap_or_default().to_string(),
                    req.param("endtime").unwrap_or_default().to_string(),
                )
            })
            .collect();
        assert_eq!(
            bounds,
            vec![
                ("2024-01-01".to_string(), "2024-01-31".to_string()),
                ("2024-01-01".to_string(), "2024-01-16".to_string()),
                ("2024-01-01".to_string(), "2024-01-08".to_string()),
                ("2024-01-09".to_string(), "2024-01-16".to_string()),
                ("2024-01-17".to_string(), "2024-01-31".to_string()),
            ]
        );
        assert_eq!(outcome.months[0].splits, 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("20240101.csv")).expect("read"),
            csv_body(&["q1", "q2", "h2"])
        );
    }

    #[test]
    fn transport_failure_stops_remaining_months() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(vec![
            ScriptedSession::ok(&csv_body(&["jan"])),
            ScriptedSession::ok(&csv_body(&["feb"])),
            ScriptedSession::transport("connection reset"),
            ScriptedSession::ok(&csv_body(&["never"])),
        ]);

        let err = run_backfill(
            &session,
            &request(date(2024, 1, 1), date(2024, 12, 31), &extra, temp.path()),
            |_| {},
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::Transport { .. })
        ));
        assert!(format!("{err:#}").contains("query month 2024-03-01..2024-03-31"));
        assert_eq!(session.requests().len(), 3);
        assert_eq!(session.remaining(), 1);

        assert_eq!(
            fs::read_to_string(temp.path().join("20240101.csv")).expect("read"),
            csv_body(&["jan"])
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("20240201.csv")).expect("read"),
            csv_body(&["feb"])
        );
        for month in 3..=12 {
            let path = temp.path().join(format!("2024{month:02}01.csv"));
            assert!(!path.exists(), "{} should not exist", path.display());
        }
    }

    #[test]
    fn server_error_during_bisection_aborts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(vec![
            ScriptedSession::limit_exceeded(),
            ScriptedSession::ok(&csv_body(&["a1"])),
            ScriptedSession::status(503, "Service Unavailable"),
        ]);

        let err = run_backfill(
            &session,
            &request(date(2024, 1, 1), date(2024, 1, 31), &extra, temp.path()),
            |_| {},
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::Status { status: 503, .. })
        ));
        assert!(!temp.path().join("20240101.csv").exists());
    }

    #[test]
    fn single_day_over_limit_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(vec![
            ScriptedSession::limit_exceeded(),
            ScriptedSession::limit_exceeded(),
        ]);

        let err = run_backfill(
            &session,
            &request(date(2024, 1, 1), date(2024, 1, 2), &extra, temp.path()),
            |_| {},
        )
        .unwrap_err();

        assert!(
            err.downcast_ref::<QueryError>()
                .is_some_and(QueryError::is_limit_exceeded)
        );
        let requests = session.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].param("starttime"), Some("2024-01-01"));
        assert_eq!(requests[1].param("endtime"), Some("2024-01-01"));
        assert!(!temp.path().join("20240101.csv").exists());
    }

    #[test]
    fn empty_interval_issues_no_requests() {
        let temp = tempfile::tempdir().expect("tempdir");
        let extra = QueryParams::new(Format::Csv);
        let session = ScriptedSession::new(Vec::new());
        let day = date(2024, 6, 1);

        let outcome =
            run_backfill(&session, &request(day, day, &extra, temp.path()), |_| {}).expect("run");
        assert!(outcome.months.is_empty());
        assert!(session.requests().is_empty());
    }
}
