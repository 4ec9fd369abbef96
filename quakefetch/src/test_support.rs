//! Test-only helpers: a scripted [`HttpSession`] and CSV fixtures.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::io::query::QueryError;
use crate::io::session::{HttpResponse, HttpSession};

/// Header line shared by every CSV fixture.
pub const CSV_HEADER: &str = "time,latitude,longitude,depth,mag,id";

/// One canned reply, consumed in order.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Response(HttpResponse),
    Transport(String),
}

/// A request observed by [`ScriptedSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Session that replays scripted replies and records every request.
///
/// Running out of replies yields a transport error so an unexpected extra
/// request fails the test instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    replies: RefCell<VecDeque<ScriptedReply>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ScriptedSession {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn ok(body: &str) -> ScriptedReply {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> ScriptedReply {
        ScriptedReply::Response(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn limit_exceeded() -> ScriptedReply {
        Self::status(
            400,
            "Error 400: Bad Request\n\n20345 matching events exceeds search limit of 20000. Modify the search to match fewer events.\n",
        )
    }

    pub fn transport(message: &str) -> ScriptedReply {
        ScriptedReply::Transport(message.to_string())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl HttpSession for ScriptedSession {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, QueryError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        });
        match self.replies.borrow_mut().pop_front() {
            Some(ScriptedReply::Response(response)) => Ok(response),
            Some(ScriptedReply::Transport(message)) => Err(QueryError::Transport { message }),
            None => Err(QueryError::Transport {
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}

/// CSV body with the fixture header followed by one row per id.
pub fn csv_body(ids: &[&str]) -> String {
    let mut body = format!("{CSV_HEADER}\n");
    for id in ids {
        body.push_str(&format!("2024-01-01T00:00:00.000Z,35.0,-118.0,10.0,4.5,{id}\n"));
    }
    body
}
