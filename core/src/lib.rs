//! Client-side HTTP request construction.
//!
//! # Overview
//! Builds `HttpRequest` descriptors for one domain, resolves `{name}` path
//! templates, hand-encodes single-file `multipart/form-data` bodies, and
//! classifies transport results into decoded values or `RequestError`s. The
//! actual I/O is performed by a host-supplied `Transport`.
//!
//! # Design
//! - `PathTemplate`, `multipart::encode` and `RequestBuilder` are pure and
//!   synchronous; they share no mutable state.
//! - `RequestClient` owns the per-instance configuration and the transport.
//! - Every multipart form gets its own boundary unless one is supplied, so
//!   concurrent uploads from one client never share a delimiter.
//! - Logging goes through `tracing`; the crate never installs a subscriber.

pub mod builder;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod multipart;
pub mod path;
pub mod transport;

pub use builder::{RequestBuilder, RequestOptions};
pub use client::RequestClient;
pub use config::ClientConfig;
pub use dispatch::{Decoder, JsonDecoder};
pub use error::{DecodeError, RequestError, TransportError, TransportErrorKind};
pub use http::{
    CachePolicy, ContentType, HttpRequest, HttpResponse, Method, RequestBody, Scheme,
    CONTENT_LENGTH_HEADER, CONTENT_TYPE_HEADER,
};
pub use multipart::{MultipartError, MultipartForm};
pub use path::{Endpoint, PathError, PathTemplate};
pub use transport::{
    DataCompletion, DataOutcome, DownloadCompletion, DownloadOutcome, TaskHandle, Transport,
    TransportOutcome,
};
