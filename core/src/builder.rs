//! Assembles `HttpRequest` descriptors from a domain and a path.
//!
//! URL assembly failures yield `None` rather than an error: callers treat an
//! absent descriptor as "could not build a request" and never send it. The
//! failing field is reported through a `tracing` debug event.

use std::time::Duration;

use url::Url;

use crate::config::ClientConfig;
use crate::http::{CachePolicy, ContentType, HttpRequest, Method, RequestBody, Scheme};

/// Stand-in scheme used to assemble scheme-relative URLs; stripped afterwards.
const RELATIVE_SCHEME: &str = "relative";

/// Per-call overrides for the `build_*` conveniences.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions<'a> {
    /// Attached as `?name=value&...`; nothing is attached when empty.
    pub query: &'a [(&'a str, &'a str)],
    /// Overrides the client's default scheme.
    pub scheme: Option<Scheme>,
    /// Overrides the method's default `Content-Type`.
    pub content_type: Option<ContentType>,
}

impl<'a> RequestOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: &'a [(&'a str, &'a str)]) -> Self {
        self.query = query;
        self
    }

    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

/// Stateless request assembler bound to one domain.
///
/// Pure value: cheap to clone and safe to use from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    domain: String,
    default_scheme: Scheme,
    port: Option<u16>,
    timeout: Duration,
    cache_policy: CachePolicy,
}

impl RequestBuilder {
    pub fn new(domain: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            domain: domain.into(),
            default_scheme: config.default_scheme,
            port: config.port,
            timeout: config.timeout,
            cache_policy: config.cache_policy,
        }
    }

    /// Build a descriptor, or `None` when the URL cannot be assembled.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        scheme: Option<Scheme>,
        headers: Vec<(String, String)>,
        body: Option<RequestBody>,
    ) -> Option<HttpRequest> {
        let url = self.url(path, query, scheme)?;
        Some(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.timeout,
            cache_policy: self.cache_policy,
            handle_cookies: true,
        })
    }

    /// Absolute URL for `path` on this builder's domain.
    pub fn url(&self, path: &str, query: &[(&str, &str)], scheme: Option<Scheme>) -> Option<String> {
        if !path.is_empty() && !path.starts_with('/') {
            tracing::debug!(path, "cannot build url: path must be empty or start with `/`");
            return None;
        }
        let scheme = scheme.unwrap_or(self.default_scheme);
        let wire_scheme = scheme.as_str().unwrap_or(RELATIVE_SCHEME);

        let mut url = match Url::parse(&format!("{wire_scheme}://{}", self.domain)) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(domain = %self.domain, error = %err, "cannot build url: invalid domain");
                return None;
            }
        };
        if !is_bare_host(&url) {
            tracing::debug!(domain = %self.domain, "cannot build url: domain must be a bare host");
            return None;
        }
        if url.set_port(self.port).is_err() {
            tracing::debug!(port = ?self.port, "cannot build url: port rejected");
            return None;
        }
        url.set_path(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let url = String::from(url);
        match scheme.as_str() {
            Some(_) => Some(url),
            None => url
                .strip_prefix(RELATIVE_SCHEME)
                .and_then(|rest| rest.strip_prefix(':'))
                .map(str::to_string),
        }
    }
}

fn is_bare_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| !host.is_empty())
        && url.port().is_none()
        && url.username().is_empty()
        && url.password().is_none()
        && (url.path().is_empty() || url.path() == "/")
        && url.query().is_none()
        && url.fragment().is_none()
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn builder(domain: &str) -> RequestBuilder {
        RequestBuilder::new(domain, &ClientConfig::default())
    }

    #[test]
    fn https_is_the_default_scheme() {
        let url = builder("example.com").url("/api/users", &[], None).unwrap();
        assert_eq!(url, "https://example.com/api/users");
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let url = builder("example.com").url("/a", &[], None).unwrap();
        assert!(!url.contains('?'));
    }

    #[test]
    fn query_items_are_appended() {
        let url = builder("example.com")
            .url("/search", &[("q", "rust"), ("page", "2")], Some(Scheme::Http))
            .unwrap();
        assert_eq!(url, "http://example.com/search?q=rust&page=2");
    }

    #[test]
    fn configured_port_is_used() {
        let config = ClientConfig {
            port: Some(8080),
            ..ClientConfig::default()
        };
        let url = RequestBuilder::new("localhost", &config)
            .url("/x", &[], Some(Scheme::Http))
            .unwrap();
        assert_eq!(url, "http://localhost:8080/x");
    }

    #[test]
    fn websocket_scheme() {
        let url = builder("example.com").url("/live", &[], Some(Scheme::WebSocket)).unwrap();
        assert_eq!(url, "ws://example.com/live");
    }

    #[test]
    fn scheme_none_is_scheme_relative() {
        let config = ClientConfig {
            port: Some(9000),
            ..ClientConfig::default()
        };
        let url = RequestBuilder::new("cdn.example.com", &config)
            .url("/img.png", &[], Some(Scheme::None))
            .unwrap();
        assert_eq!(url, "//cdn.example.com:9000/img.png");
    }

    #[test]
    fn relative_path_cannot_be_built() {
        assert!(builder("example.com").url("api/users", &[], None).is_none());
    }

    #[test]
    fn invalid_domains_cannot_be_built() {
        assert!(builder("").url("/a", &[], None).is_none());
        assert!(builder("bad host").url("/a", &[], None).is_none());
        assert!(builder("example.com/extra").url("/a", &[], None).is_none());
        assert!(builder("example.com:81").url("/a", &[], None).is_none());
    }

    #[test]
    fn build_carries_client_settings() {
        let config = ClientConfig {
            timeout: Duration::from_secs(5),
            cache_policy: CachePolicy::ReturnCacheDataDontLoad,
            ..ClientConfig::default()
        };
        let req = RequestBuilder::new("example.com", &config)
            .build(Method::Put, "/r", &[], None, Vec::new(), None)
            .unwrap();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.timeout, Duration::from_secs(5));
        assert_eq!(req.cache_policy, CachePolicy::ReturnCacheDataDontLoad);
        assert!(req.handle_cookies);
    }

    #[test]
    #[traced_test]
    fn failed_build_names_the_field() {
        assert!(builder("bad host").url("/a", &[], None).is_none());
        assert!(logs_contain("invalid domain"));
    }
}
