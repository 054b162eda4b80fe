use pkg_types::Selector;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::{EventStream, Request, Response, Transport, Verb};

/// Fluent builder for one API call.
///
/// ```ignore
/// let quota: ResourceQuota = client
///     .get()
///     .namespace("default")
///     .resource("resourceQuotas")
///     .name("compute")
///     .send()
///     .await?
///     .decode()?;
/// ```
pub struct RequestBuilder {
    transport: Arc<dyn Transport>,
    request: Request,
    body_error: Option<serde_json::Error>,
}

impl RequestBuilder {
    pub(crate) fn new(transport: Arc<dyn Transport>, verb: Verb) -> Self {
        Self {
            transport,
            request: Request::new(verb),
            body_error: None,
        }
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.request.prefix = Some(prefix.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.request.namespace = namespace.to_string();
        self
    }

    pub fn resource(mut self, resource: &str) -> Self {
        self.request.resource = resource.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.request.name = Some(name.to_string());
        self
    }

    /// Attach a query parameter, even if its value is empty.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.request.params.push((key.to_string(), value.into()));
        self
    }

    /// Attach a selector parameter. The empty selector adds nothing.
    pub fn selector_param(self, key: &str, selector: &Selector) -> Self {
        if selector.is_empty() {
            return self;
        }
        self.param(key, selector.to_string())
    }

    /// Serialize `obj` as the JSON body. Encoding errors are reported by `send`.
    pub fn body<T: Serialize + ?Sized>(mut self, obj: &T) -> Self {
        match serde_json::to_vec(obj) {
            Ok(bytes) => self.request.body = Some(bytes),
            Err(e) => self.body_error = Some(e),
        }
        self
    }

    fn finish(self) -> Result<(Arc<dyn Transport>, Request)> {
        if let Some(e) = self.body_error {
            return Err(Error::Encode(e));
        }
        Ok((self.transport, self.request))
    }

    /// Execute the request once.
    pub async fn send(self) -> Result<Response> {
        let (transport, request) = self.finish()?;
        debug!(
            verb = %request.verb,
            path = %request.path(),
            params = ?request.params,
            "API request"
        );
        transport.execute(request).await
    }

    /// Open a change feed with the accumulated parameters.
    pub async fn watch(self) -> Result<EventStream> {
        let (transport, request) = self.finish()?;
        debug!(
            path = %request.path(),
            params = ?request.params,
            "Opening watch"
        );
        transport.watch(request).await
    }
}
