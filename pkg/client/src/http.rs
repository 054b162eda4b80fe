//! HTTP transport over `reqwest`.
//!
//! Watches are read as a line-oriented feed: the API server answers with
//! server-sent events carrying one JSON `WatchEvent` per `data:` line.
//! Bare JSON lines are accepted too; blank and `:` keep-alive lines are
//! skipped.

use async_trait::async_trait;
use futures_util::{Stream, StreamExt, stream};
use pkg_constants::api::MAX_WATCH_LINE_BYTES;
use pkg_constants::network::DEFAULT_CONNECT_TIMEOUT_SECS;
use pkg_types::{Status, StatusReason, WatchEvent};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{EventStream, Request, Response, Transport, Verb};

pub struct HttpTransport {
    http: reqwest::Client,
    server: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            server: Url::parse(&config.server)
                .map_err(|e| Error::InvalidRequest(format!("{}: {}", config.server, e)))?,
            token: config.token.clone(),
            timeout: config.timeout,
        })
    }

    fn url(&self, request: &Request) -> Result<Url> {
        let segments = request.segments();
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidRequest(format!(
                "invalid path segment {:?} in {}",
                bad,
                request.path()
            )));
        }
        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidRequest(format!("{} cannot be a base URL", self.server)))?
            .pop_if_empty()
            .extend(segments);
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }

    fn prepare(&self, request: Request) -> Result<reqwest::RequestBuilder> {
        let url = self.url(&request)?;
        let method = match request.verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        };
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let resp = self.prepare(request)?.timeout(self.timeout).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "API response");
        Ok(Response { status, body })
    }

    async fn watch(&self, request: Request) -> Result<EventStream> {
        let resp = self
            .prepare(request)?
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await?;
            return Err(Error::Api(Status::from_response(status.as_u16(), &body)));
        }
        Ok(event_lines(resp.bytes_stream()))
    }
}

struct LineReader<S> {
    body: Pin<Box<S>>,
    buf: Vec<u8>,
    done: bool,
}

/// Split a chunked body into watch events. A body error, or a line longer
/// than `MAX_WATCH_LINE_BYTES`, is yielded once and ends the stream.
pub(crate) fn event_lines<S, B, E>(body: S) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<Error> + Send,
{
    bounded_event_lines(body, MAX_WATCH_LINE_BYTES)
}

fn bounded_event_lines<S, B, E>(body: S, max_line: usize) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<Error> + Send,
{
    let reader = LineReader {
        body: Box::pin(body),
        buf: Vec::new(),
        done: false,
    };
    stream::unfold(reader, move |mut reader| async move {
        loop {
            if let Some(pos) = reader.buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = reader.buf.drain(..=pos).collect();
                if let Some(event) = parse_line(&line) {
                    return Some((Ok::<_, Error>(event), reader));
                }
                continue;
            }
            if reader.buf.len() > max_line {
                reader.done = true;
                reader.buf.clear();
                let err = Error::Watch(format!("event line exceeds {} bytes", max_line));
                return Some((Err(err), reader));
            }
            if reader.done {
                let rest = std::mem::take(&mut reader.buf);
                return parse_line(&rest).map(|event| (Ok(event), reader));
            }
            match reader.body.next().await {
                Some(Ok(chunk)) => reader.buf.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    reader.done = true;
                    reader.buf.clear();
                    let err: Error = e.into();
                    return Some((Err(err), reader));
                }
                None => reader.done = true,
            }
        }
    })
    .boxed()
}

fn parse_line(line: &[u8]) -> Option<WatchEvent<serde_json::Value>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() || text.starts_with(':') {
        return None;
    }
    let payload = match text.strip_prefix("data:") {
        Some(data) => data.trim_start(),
        None if ["event:", "id:", "retry:"].iter().any(|f| text.starts_with(*f)) => return None,
        None => text,
    };
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Undecodable watch event: {}", e);
            Some(WatchEvent::Error(Status::new(
                StatusReason::InternalError,
                format!("undecodable watch event: {}", e),
            )))
        }
    }
}
