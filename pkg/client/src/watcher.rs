use futures_util::future::{AbortHandle, Abortable};
use futures_util::{Stream, StreamExt};
use pkg_types::{Resource, Status, StatusReason, WatchEvent};
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::EventStream;

/// An open change feed for one kind in one namespace.
///
/// Yields events until stopped or until the transport fails; a transport
/// failure is reported as a final `WatchEvent::Error`. A stopped watcher
/// cannot be resumed: open a new one from the last observed
/// resourceVersion instead.
pub struct Watcher<K> {
    events: Abortable<EventStream>,
    handle: AbortHandle,
    failed: bool,
    _kind: PhantomData<fn() -> K>,
}

/// Stops a watcher from anywhere, e.g. another task.
#[derive(Debug, Clone)]
pub struct WatchStopper(AbortHandle);

impl WatchStopper {
    pub fn stop(&self) {
        self.0.abort();
    }
}

impl<K: Resource> Watcher<K> {
    pub(crate) fn new(events: EventStream) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self {
            events: Abortable::new(events, registration),
            handle,
            failed: false,
            _kind: PhantomData,
        }
    }

    /// Wait for the next event. `None` once the feed is closed.
    pub async fn recv(&mut self) -> Option<WatchEvent<K>> {
        self.next().await
    }

    /// Close the feed. Safe to call any number of times.
    pub fn stop(&self) {
        if !self.handle.is_aborted() {
            debug!(kind = K::KIND, "Stopping watch");
        }
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_aborted()
    }

    pub fn stopper(&self) -> WatchStopper {
        WatchStopper(self.handle.clone())
    }
}

impl<K: Resource> Stream for Watcher<K> {
    type Item = WatchEvent<K>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.failed {
            return Poll::Ready(None);
        }
        match Pin::new(&mut this.events).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Ready(Some(Ok(raw))) => Poll::Ready(Some(decode_event::<K>(raw))),
            Poll::Ready(Some(Err(e))) => {
                this.failed = true;
                warn!(kind = K::KIND, "Watch stream failed: {}", e);
                Poll::Ready(Some(WatchEvent::Error(stream_failure(e))))
            }
        }
    }
}

fn decode_event<K: Resource>(raw: WatchEvent<serde_json::Value>) -> WatchEvent<K> {
    let decoded = match raw {
        WatchEvent::Added(v) => serde_json::from_value(v).map(WatchEvent::Added),
        WatchEvent::Modified(v) => serde_json::from_value(v).map(WatchEvent::Modified),
        WatchEvent::Deleted(v) => serde_json::from_value(v).map(WatchEvent::Deleted),
        WatchEvent::Error(mut status) => {
            if status.code == 0 {
                status.code = status.reason.code();
            }
            Ok(WatchEvent::Error(status))
        }
    };
    decoded.unwrap_or_else(|e| {
        warn!(kind = K::KIND, "Undecodable watch object: {}", e);
        WatchEvent::Error(Status::new(
            StatusReason::InternalError,
            format!("failed to decode {} object: {}", K::KIND, e),
        ))
    })
}

fn stream_failure(e: Error) -> Status {
    match e {
        Error::Api(status) => status,
        other => Status::new(StatusReason::InternalError, other.to_string()),
    }
}
