//! HTTP session abstraction for catalog requests.
//!
//! The [`HttpSession`] trait decouples query execution from the HTTP client so
//! orchestration can be tested with scripted responses. [`ReqwestSession`]
//! holds one blocking `reqwest` client for the whole run, so repeated requests
//! reuse pooled connections.

use std::error::Error as StdError;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::io::query::QueryError;

/// Status and body of a completed HTTP exchange, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A reusable connection handle. Not shared across threads.
pub trait HttpSession {
    /// Issue `GET url?query`. Only network-level failures are errors here;
    /// non-2xx statuses are returned as responses.
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, QueryError>;
}

/// Client settings applied when building a [`ReqwestSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

/// Session backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    pub fn new(options: &SessionOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl HttpSession for ReqwestSession {
    #[instrument(skip_all, fields(url = url))]
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, QueryError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> QueryError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    QueryError::Transport { message }
}
