//! Recording transport for unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use std::sync::{Arc, Mutex};

use crate::{RawResponse, Transport, TransportError};

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl RecordedCall {
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .map(|body| serde_json::from_slice(body).unwrap())
    }
}

enum Reply {
    Respond(StatusCode, Bytes),
    Fail(fn() -> TransportError),
}

/// Answers every request with the same canned reply and records what it saw.
#[derive(Clone)]
pub(crate) struct StubTransport {
    reply: Arc<Reply>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubTransport {
    pub fn responding(status: StatusCode, body: &'static str) -> Self {
        Self {
            reply: Arc::new(Reply::Respond(status, Bytes::from_static(body.as_bytes()))),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: fn() -> TransportError) -> Self {
        Self {
            reply: Arc::new(Reply::Fail(error)),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        match self.reply.as_ref() {
            Reply::Respond(status, body) => Ok(RawResponse::new(*status, body.clone())),
            Reply::Fail(error) => Err(error()),
        }
    }
}
