//! The seam between typed clients and the wire.
//!
//! A `Transport` executes fully-described `Request`s. The HTTP
//! implementation lives in `http.rs`; tests plug in their own.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use pkg_constants::api::{API_PREFIX, NAMESPACES_SEGMENT};
use pkg_types::{Status, WatchEvent};
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        })
    }
}

/// A request against `/api/v1[/{prefix}][/namespaces/{ns}]/{resource}[/{name}]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub verb: Verb,
    pub prefix: Option<String>,
    /// Empty means "no namespace segment"; the server picks its default.
    pub namespace: String,
    pub resource: String,
    pub name: Option<String>,
    pub params: Vec<(String, String)>,
    /// JSON-encoded payload.
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            prefix: None,
            namespace: String::new(),
            resource: String::new(),
            name: None,
            params: Vec::new(),
            body: None,
        }
    }

    /// Path segments after the host, unescaped. Each entry is one segment
    /// even if it contains `/`, `?` or `#`.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = API_PREFIX.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(prefix) = &self.prefix {
            segments.push(prefix);
        }
        if !self.namespace.is_empty() {
            segments.push(NAMESPACES_SEGMENT);
            segments.push(&self.namespace);
        }
        segments.push(&self.resource);
        if let Some(name) = &self.name {
            segments.push(name);
        }
        segments
    }

    /// Readable URL path, without scheme, host or query. Segments are not
    /// escaped; transports encode them one by one.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in self.segments() {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// First value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A completed exchange. Decoding and status checks are deferred to the
/// caller so every transport reports errors the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a successful body into `T`, or surface the server's status.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        self.error_for_status()?;
        serde_json::from_slice(&self.body).map_err(Error::Decode)
    }

    /// Discard the body of a successful response, or surface the server's status.
    pub fn error(self) -> Result<()> {
        self.error_for_status()
    }

    fn error_for_status(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::Api(Status::from_response(self.status, &self.body)))
        }
    }
}

/// Raw change feed: events whose objects are still undecoded JSON.
pub type EventStream = BoxStream<'static, Result<WatchEvent<serde_json::Value>>>;

/// Executes requests against the control plane.
///
/// Implementations must allow concurrent independent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    async fn execute(&self, request: Request) -> Result<Response>;

    /// Open a change feed. Fails only if the feed cannot be established;
    /// later failures are items of the returned stream.
    async fn watch(&self, request: Request) -> Result<EventStream>;
}
