//! Request client bound to one domain.
//!
//! # Design
//! `RequestClient` owns a `ClientConfig` and a `Transport`. Building a request
//! (`build_*`) is pure; sending one hands the descriptor to the transport and
//! classifies the outcome through `dispatch`. Each send comes in three
//! flavors: raw (outcome handed back untouched), status-checked, and typed
//! (decoded). The `fetch*` methods wrap the callback API in a future that
//! resolves exactly once.
//!
//! Nothing is retried. Construction errors (path, multipart) are returned
//! before the transport sees anything.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use crate::builder::{RequestBuilder, RequestOptions};
use crate::config::ClientConfig;
use crate::dispatch::{self, Decoder, JsonDecoder};
use crate::error::{RequestError, TransportError};
use crate::http::{
    CachePolicy, ContentType, HttpRequest, Method, RequestBody, Scheme, CONTENT_TYPE_HEADER,
};
use crate::multipart::{self, MultipartError, MultipartForm};
use crate::path::Endpoint;
use crate::transport::{DataOutcome, DownloadOutcome, TaskHandle, Transport};

/// Issues requests against one domain through an injected `Transport`.
#[derive(Clone)]
pub struct RequestClient {
    domain: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("domain", &self.domain)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn new(domain: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self::with_config(domain, ClientConfig::default(), transport)
    }

    pub fn with_config(
        domain: impl Into<String>,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            domain: domain.into(),
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    pub fn set_default_scheme(&mut self, scheme: Scheme) {
        self.config.default_scheme = scheme;
    }

    pub fn set_port(&mut self, port: Option<u16>) {
        self.config.port = port;
    }

    pub fn set_cache_policy(&mut self, cache_policy: CachePolicy) {
        self.config.cache_policy = cache_policy;
    }

    /// Builder snapshot of the current configuration.
    pub fn builder(&self) -> RequestBuilder {
        RequestBuilder::new(self.domain.clone(), &self.config)
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_get(&self, path: &str, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_with_content_type(Method::Get, path, None, options, ContentType::APPLICATION_JSON)
    }

    pub fn build_post(&self, path: &str, body: Option<Vec<u8>>, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_with_content_type(Method::Post, path, body, options, ContentType::APPLICATION_JSON)
    }

    pub fn build_put(&self, path: &str, body: Option<Vec<u8>>, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_with_content_type(Method::Put, path, body, options, ContentType::APPLICATION_JSON)
    }

    pub fn build_patch(&self, path: &str, body: Option<Vec<u8>>, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_with_content_type(Method::Patch, path, body, options, ContentType::APPLICATION_JSON)
    }

    pub fn build_delete(&self, path: &str, body: Option<Vec<u8>>, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_with_content_type(Method::Delete, path, body, options, ContentType::APPLICATION_JSON)
    }

    /// GET request for a file download. No `Content-Type` is set.
    pub fn build_download(&self, path: &str, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.builder()
            .build(Method::Get, path, options.query, options.scheme, Vec::new(), None)
    }

    /// POST request to be completed by `send_multipart_upload`.
    pub fn build_multipart_post(&self, path: &str, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.builder()
            .build(Method::Post, path, options.query, options.scheme, Vec::new(), None)
    }

    pub fn build_get_endpoint(&self, endpoint: &Endpoint, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_get(endpoint.as_str(), options)
    }

    /// Endpoint writes default to `application/x-www-form-urlencoded`.
    pub fn build_post_endpoint(
        &self,
        endpoint: &Endpoint,
        body: Vec<u8>,
        options: &RequestOptions<'_>,
    ) -> Option<HttpRequest> {
        self.build_with_content_type(
            Method::Post,
            endpoint.as_str(),
            Some(body),
            options,
            ContentType::APPLICATION_FORM_URL_ENCODED,
        )
    }

    pub fn build_put_endpoint(
        &self,
        endpoint: &Endpoint,
        body: Option<Vec<u8>>,
        options: &RequestOptions<'_>,
    ) -> Option<HttpRequest> {
        self.build_with_content_type(
            Method::Put,
            endpoint.as_str(),
            body,
            options,
            ContentType::APPLICATION_FORM_URL_ENCODED,
        )
    }

    pub fn build_patch_endpoint(
        &self,
        endpoint: &Endpoint,
        body: Option<Vec<u8>>,
        options: &RequestOptions<'_>,
    ) -> Option<HttpRequest> {
        self.build_with_content_type(
            Method::Patch,
            endpoint.as_str(),
            body,
            options,
            ContentType::APPLICATION_FORM_URL_ENCODED,
        )
    }

    pub fn build_delete_endpoint(
        &self,
        endpoint: &Endpoint,
        body: Option<Vec<u8>>,
        options: &RequestOptions<'_>,
    ) -> Option<HttpRequest> {
        self.build_with_content_type(
            Method::Delete,
            endpoint.as_str(),
            body,
            options,
            ContentType::APPLICATION_FORM_URL_ENCODED,
        )
    }

    pub fn build_download_endpoint(&self, endpoint: &Endpoint, options: &RequestOptions<'_>) -> Option<HttpRequest> {
        self.build_download(endpoint.as_str(), options)
    }

    pub fn build_multipart_post_endpoint(
        &self,
        endpoint: &Endpoint,
        options: &RequestOptions<'_>,
    ) -> Option<HttpRequest> {
        self.build_multipart_post(endpoint.as_str(), options)
    }

    fn build_with_content_type(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: &RequestOptions<'_>,
        default_content_type: ContentType,
    ) -> Option<HttpRequest> {
        let content_type = options.content_type.clone().unwrap_or(default_content_type);
        let headers = vec![(CONTENT_TYPE_HEADER.to_string(), content_type.as_str().to_string())];
        self.builder().build(
            method,
            path,
            options.query,
            options.scheme,
            headers,
            body.map(RequestBody::Bytes),
        )
    }

    // -----------------------------------------------------------------------
    // Send
    // -----------------------------------------------------------------------

    /// Send `request` and hand the transport's outcome back untouched.
    pub fn send_raw<F>(&self, request: HttpRequest, on_complete: F) -> TaskHandle
    where
        F: FnOnce(DataOutcome) + Send + 'static,
    {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let handle = TaskHandle::new();
        self.transport.send(request, handle.clone(), Box::new(on_complete));
        handle
    }

    /// Send `request` and status-check the outcome.
    pub fn send_data<F>(&self, request: HttpRequest, on_complete: F) -> TaskHandle
    where
        F: FnOnce(Result<Option<Vec<u8>>, RequestError>) + Send + 'static,
    {
        self.send_raw(request, move |outcome| on_complete(dispatch::check_status(outcome)))
    }

    /// Send `request` and decode the body as JSON.
    pub fn send<T, F>(&self, request: HttpRequest, on_complete: F) -> TaskHandle
    where
        T: DeserializeOwned,
        F: FnOnce(Result<T, RequestError>) + Send + 'static,
    {
        self.send_with_decoder(request, JsonDecoder, on_complete)
    }

    pub fn send_with_decoder<T, D, F>(&self, request: HttpRequest, decoder: D, on_complete: F) -> TaskHandle
    where
        T: DeserializeOwned,
        D: Decoder + Send + 'static,
        F: FnOnce(Result<T, RequestError>) + Send + 'static,
    {
        self.send_raw(request, move |outcome| {
            on_complete(dispatch::decode_response(outcome, &decoder))
        })
    }

    pub fn download_raw<F>(&self, request: HttpRequest, on_complete: F) -> TaskHandle
    where
        F: FnOnce(DownloadOutcome) + Send + 'static,
    {
        tracing::debug!(url = %request.url, "starting download");
        let handle = TaskHandle::new();
        self.transport
            .send_for_download(request, handle.clone(), Box::new(on_complete));
        handle
    }

    /// Download `request`'s body; completes with the file location.
    pub fn download<F>(&self, request: HttpRequest, on_complete: F) -> TaskHandle
    where
        F: FnOnce(Result<Option<PathBuf>, RequestError>) + Send + 'static,
    {
        self.download_raw(request, move |outcome| on_complete(dispatch::check_status(outcome)))
    }

    /// Send `request` with `file` streamed from disk as its body.
    pub fn upload<F>(&self, mut request: HttpRequest, file: impl Into<PathBuf>, on_complete: F) -> TaskHandle
    where
        F: FnOnce(DataOutcome) + Send + 'static,
    {
        request.body = Some(RequestBody::File(file.into()));
        self.send_raw(request, on_complete)
    }

    /// Encode `file` as a fresh multipart form (parameter `image`) and send it.
    ///
    /// Fails without sending anything when the body cannot be built.
    pub fn send_multipart_upload<F>(
        &self,
        request: HttpRequest,
        file: &Path,
        content_type: &str,
        on_complete: F,
    ) -> Result<TaskHandle, RequestError>
    where
        F: FnOnce(Result<Option<Vec<u8>>, RequestError>) + Send + 'static,
    {
        self.send_multipart_upload_with(&MultipartForm::default(), request, file, content_type, on_complete)
    }

    pub fn send_multipart_upload_with<F>(
        &self,
        form: &MultipartForm,
        mut request: HttpRequest,
        file: &Path,
        content_type: &str,
        on_complete: F,
    ) -> Result<TaskHandle, RequestError>
    where
        F: FnOnce(Result<Option<Vec<u8>>, RequestError>) + Send + 'static,
    {
        form.configure(&mut request, file, content_type)?;
        Ok(self.send_data(request, on_complete))
    }

    // -----------------------------------------------------------------------
    // Async
    // -----------------------------------------------------------------------

    pub async fn fetch<T>(&self, request: HttpRequest) -> Result<T, RequestError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.send(request, move |result| {
            let _ = tx.send(result);
        });
        resolve(rx).await
    }

    pub async fn fetch_data(&self, request: HttpRequest) -> Result<Option<Vec<u8>>, RequestError> {
        let (tx, rx) = oneshot::channel();
        self.send_data(request, move |result| {
            let _ = tx.send(result);
        });
        resolve(rx).await
    }

    pub async fn fetch_download(&self, request: HttpRequest) -> Result<Option<PathBuf>, RequestError> {
        let (tx, rx) = oneshot::channel();
        self.download(request, move |result| {
            let _ = tx.send(result);
        });
        resolve(rx).await
    }

    /// Async `send_multipart_upload`; the file is read without blocking the
    /// executor.
    pub async fn fetch_multipart_upload(
        &self,
        mut request: HttpRequest,
        file: &Path,
        content_type: &str,
    ) -> Result<Option<Vec<u8>>, RequestError> {
        let file_bytes = tokio::fs::read(file)
            .await
            .map_err(|source| MultipartError::InvalidFile {
                path: file.to_path_buf(),
                source,
            })?;
        MultipartForm::default().configure_bytes(
            &mut request,
            &file_bytes,
            multipart::file_name_of(file)?,
            content_type,
        )?;
        self.fetch_data(request).await
    }
}

/// A transport that drops the completion resolves as cancelled.
async fn resolve<T>(rx: oneshot::Receiver<Result<T, RequestError>>) -> Result<T, RequestError> {
    rx.await
        .unwrap_or_else(|_| Err(RequestError::Network(TransportError::cancelled())))
}
