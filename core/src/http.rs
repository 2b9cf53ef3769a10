//! HTTP wire constants and request/response descriptors.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and classifies transport results without
//! touching the network itself; a `Transport` implementation owned by the host
//! performs the actual I/O.
//!
//! `Method`, `Scheme` and `CachePolicy` are closed lookup tables: each variant
//! maps to exactly one wire string and parsing a catalogued string yields the
//! same variant back.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Header key reserved for the body's media type.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
/// Header key reserved for the body's byte length.
pub const CONTENT_LENGTH_HEADER: &str = "Content-Length";

/// Returned by the `FromStr` impls in this module for strings outside the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(UnknownVariant::new("method", other)),
        }
    }
}

/// URL scheme used to reach the domain.
///
/// `Scheme::None` has no wire value; requests built with it carry a
/// scheme-relative URL (`//host/path`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
    #[serde(rename = "ws")]
    WebSocket,
    None,
}

impl Scheme {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Scheme::Http => Some("http"),
            Scheme::Https => Some("https"),
            Scheme::WebSocket => Some("ws"),
            Scheme::None => None,
        }
    }
}

impl FromStr for Scheme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "ws" => Ok(Scheme::WebSocket),
            other => Err(UnknownVariant::new("scheme", other)),
        }
    }
}

/// How the transport should treat locally cached responses.
///
/// Carried on every descriptor; interpreting it is up to the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    UseProtocolCachePolicy,
    #[default]
    ReloadIgnoringLocalCacheData,
    ReturnCacheDataElseLoad,
    ReturnCacheDataDontLoad,
}

impl CachePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::UseProtocolCachePolicy => "use_protocol_cache_policy",
            CachePolicy::ReloadIgnoringLocalCacheData => "reload_ignoring_local_cache_data",
            CachePolicy::ReturnCacheDataElseLoad => "return_cache_data_else_load",
            CachePolicy::ReturnCacheDataDontLoad => "return_cache_data_dont_load",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "use_protocol_cache_policy" => Ok(CachePolicy::UseProtocolCachePolicy),
            "reload_ignoring_local_cache_data" => Ok(CachePolicy::ReloadIgnoringLocalCacheData),
            "return_cache_data_else_load" => Ok(CachePolicy::ReturnCacheDataElseLoad),
            "return_cache_data_dont_load" => Ok(CachePolicy::ReturnCacheDataDontLoad),
            other => Err(UnknownVariant::new("cache policy", other)),
        }
    }
}

/// A MIME type as sent in the `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType(Cow<'static, str>);

impl ContentType {
    pub const APPLICATION_FORM_URL_ENCODED: ContentType =
        ContentType(Cow::Borrowed("application/x-www-form-urlencoded"));
    pub const APPLICATION_OCTET_STREAM: ContentType =
        ContentType(Cow::Borrowed("application/octet-stream"));
    pub const APPLICATION_JSON: ContentType = ContentType(Cow::Borrowed("application/json"));
    pub const APPLICATION_ZIP: ContentType = ContentType(Cow::Borrowed("application/zip"));
    pub const IMAGE_JPEG: ContentType = ContentType(Cow::Borrowed("image/jpeg"));
    pub const IMAGE_PNG: ContentType = ContentType(Cow::Borrowed("image/png"));
    pub const TEXT_HTML: ContentType = ContentType(Cow::Borrowed("text/html;charset=utf-8"));
    pub const ANY: ContentType = ContentType(Cow::Borrowed("*/*"));

    pub fn new(value: impl Into<String>) -> Self {
        ContentType(Cow::Owned(value.into()))
    }

    /// `multipart/form-data; boundary=<boundary>`
    pub fn multipart_form_data(boundary: &str) -> Self {
        ContentType(Cow::Owned(format!("multipart/form-data; boundary={boundary}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// In-memory bytes sent as-is.
    Bytes(Vec<u8>),
    /// A file on disk, streamed by the transport.
    File(PathBuf),
}

/// An HTTP request described as plain data.
///
/// Built by `RequestBuilder` (usually through `RequestClient::build_*`). The
/// `Transport` is responsible for executing it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
    pub cache_policy: CachePolicy,
    pub handle_cookies: bool,
}

impl HttpRequest {
    /// Value of the first header whose key matches `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace any header with key `name` (case-sensitive) by a single entry.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| key != name);
        self.headers.push((name.to_string(), value.into()));
    }

    /// Body bytes, if the body is held in memory.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            Some(RequestBody::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }
}

/// Status line and headers of a completed response.
///
/// The payload travels separately (bytes for data tasks, a file location for
/// downloads), see `TransportOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
