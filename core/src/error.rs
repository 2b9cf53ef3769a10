//! Error types surfaced by the request client.
//!
//! # Design
//! Construction-time failures (`PathError`, `MultipartError`) are returned
//! synchronously before anything reaches the transport. Everything observed
//! after a request was handed to the transport arrives through the request's
//! completion as a `RequestError`; nothing is logged and swallowed.

use std::fmt;

use crate::multipart::MultipartError;
use crate::path::PathError;

/// Broad category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Cancelled,
    Io,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Cancelled => "cancelled",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Failure reported by the `Transport` itself (no usable response).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(TransportErrorKind::Cancelled, "request was cancelled")
    }
}

/// The response body did not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("decoding {type_name} failed: {message}")]
pub struct DecodeError {
    pub type_name: &'static str,
    pub message: String,
}

/// Errors returned to callers of `RequestClient`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// Transport-level failure, surfaced as-is.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The server answered with a status outside `200..300`.
    #[error("{message}")]
    UnsuccessfulStatusCode { status_code: u16, message: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// 2xx status but no payload where one was expected.
    #[error("response carried no data")]
    MissingData,
}

impl RequestError {
    pub fn unsuccessful_status(status_code: u16) -> Self {
        RequestError::UnsuccessfulStatusCode {
            status_code,
            message: format!("Error status code: {status_code}"),
        }
    }

    /// Status code of an `UnsuccessfulStatusCode` error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::UnsuccessfulStatusCode { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
