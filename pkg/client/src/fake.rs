//! Recording transport for unit tests.

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use pkg_types::WatchEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::transport::{EventStream, Request, Response, Transport};

type RawEvent = Result<WatchEvent<serde_json::Value>>;

#[derive(Default)]
struct FakeState {
    requests: Vec<Request>,
    responses: VecDeque<Result<Response>>,
    watches: VecDeque<Result<Vec<RawEvent>>>,
}

/// Answers from queued responses and remembers every request.
/// Watch feeds replay their queued events and then stay open.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn respond(&self, response: Result<Response>) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond(Ok(Response::new(status, body.to_string())));
    }

    pub fn feed(&self, events: Result<Vec<RawEvent>>) {
        self.state.lock().unwrap().watches.push_back(events);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(200, "{}")))
    }

    async fn watch(&self, request: Request) -> Result<EventStream> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        let events = state.watches.pop_front().unwrap_or_else(|| Ok(Vec::new()))?;
        Ok(stream::iter(events).chain(stream::pending()).boxed())
    }
}
