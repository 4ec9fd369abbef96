//! Shared `mockito` helpers for tests that talk to a stand-in catalog.

#![allow(dead_code)]

use std::net::TcpListener;

use mockito::{Matcher, Mock, ServerGuard};

pub const QUERY_PATH: &str = "/fdsnws/event/1/query";

pub const CSV_HEADER: &str = "time,latitude,longitude,depth,mag,id";

pub const LIMIT_BODY: &str = "Error 400: Bad Request\n\n20345 matching events exceeds search limit of 20000. Modify the search to match fewer events.\n";

/// Catalog endpoint URL on `server`.
pub fn query_url(server: &ServerGuard) -> String {
    format!("{}{QUERY_PATH}", server.url())
}

/// Matches a CSV request for exactly `start..end` plus any `extra` pairs.
pub fn csv_range(start: &str, end: &str, extra: &[(&str, &str)]) -> Matcher {
    let mut matchers = vec![
        Matcher::UrlEncoded("format".into(), "csv".into()),
        Matcher::UrlEncoded("starttime".into(), start.into()),
        Matcher::UrlEncoded("endtime".into(), end.into()),
    ];
    matchers.extend(
        extra
            .iter()
            .map(|(name, value)| Matcher::UrlEncoded((*name).into(), (*value).into())),
    );
    Matcher::AllOf(matchers)
}

/// Expect one request for `start..end` and answer with a single row
/// labelled by the range.
pub fn mock_month_rows(
    server: &mut ServerGuard,
    start: &str,
    end: &str,
    extra: &[(&str, &str)],
) -> Mock {
    server
        .mock("GET", QUERY_PATH)
        .match_query(csv_range(start, end, extra))
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body(csv_rows(&[format!("{start}..{end}")]))
        .expect(1)
        .create()
}

/// CSV body with one row per label.
pub fn csv_rows(labels: &[String]) -> String {
    let mut body = format!("{CSV_HEADER}\n");
    for label in labels {
        body.push_str(&format!("2024-01-01T00:00:00.000Z,35.0,-118.0,10.0,4.5,{label}\n"));
    }
    body
}

/// Address on loopback with nothing listening.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}{QUERY_PATH}")
}
