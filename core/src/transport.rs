//! The HTTP transport capability the client is built on.
//!
//! # Design
//! The core never performs I/O. A `Transport` (supplied by the host) executes
//! an `HttpRequest` off the caller's thread and invokes the boxed completion
//! once it is done. Completions are `FnOnce`, so a transport can deliver a
//! result at most once; dropping the completion without calling it is how a
//! transport signals that nothing will be delivered.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Raw result of one transport round-trip.
///
/// Any combination of fields may be present; classification is done by
/// `dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportOutcome<P> {
    pub payload: Option<P>,
    pub response: Option<HttpResponse>,
    pub error: Option<TransportError>,
}

/// Outcome of a data task: the response body bytes.
pub type DataOutcome = TransportOutcome<Vec<u8>>;
/// Outcome of a download task: where the transport stored the body.
pub type DownloadOutcome = TransportOutcome<PathBuf>;

impl<P> TransportOutcome<P> {
    pub fn success(payload: P, response: HttpResponse) -> Self {
        Self {
            payload: Some(payload),
            response: Some(response),
            error: None,
        }
    }

    pub fn failure(error: TransportError) -> Self {
        Self {
            payload: None,
            response: None,
            error: Some(error),
        }
    }
}

pub type DataCompletion = Box<dyn FnOnce(DataOutcome) + Send + 'static>;
pub type DownloadCompletion = Box<dyn FnOnce(DownloadOutcome) + Send + 'static>;

/// Cancellation handle for an in-flight request.
///
/// Cancelling only raises a flag; honoring it is up to the transport.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Executes requests on behalf of `RequestClient`.
///
/// Implementations must call each completion at most once and never before
/// the request has been handed over.
pub trait Transport: Send + Sync {
    /// Execute `request` and deliver the body bytes.
    ///
    /// A `RequestBody::File` body is streamed from disk by the transport.
    fn send(&self, request: HttpRequest, handle: TaskHandle, on_complete: DataCompletion);

    /// Execute `request` and deliver the location of the downloaded body.
    fn send_for_download(&self, request: HttpRequest, handle: TaskHandle, on_complete: DownloadCompletion);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest, handle: TaskHandle, on_complete: DataCompletion) {
        (**self).send(request, handle, on_complete)
    }

    fn send_for_download(&self, request: HttpRequest, handle: TaskHandle, on_complete: DownloadCompletion) {
        (**self).send_for_download(request, handle, on_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let handle = TaskHandle::new();
        let seen_by_transport = handle.clone();
        assert!(!seen_by_transport.is_cancelled());
        handle.cancel();
        assert!(seen_by_transport.is_cancelled());
    }
}
