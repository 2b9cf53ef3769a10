//! Single-part `multipart/form-data` encoding.
//!
//! # Wire format
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{parameter}"; filename="{file}"\r\n
//! Content-Type: {content type}\r\n
//! \r\n
//! {raw file bytes}\r\n
//! --{boundary}--\r\n
//! ```
//!
//! The whole body is buffered in memory. `MultipartForm` is an immutable value;
//! each one gets a fresh boundary unless the caller supplies one, so two
//! uploads in flight never share a delimiter by accident.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::http::{ContentType, HttpRequest, RequestBody, CONTENT_LENGTH_HEADER, CONTENT_TYPE_HEADER};

const MARKER: &str = "--";
const CRLF: &str = "\r\n";

/// Errors raised while building a multipart body.
#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    /// A header component cannot be represented in the frame.
    #[error("unable to encode multipart body: {0}")]
    UnableToEncode(String),

    /// The source file could not be read.
    #[error("cannot read upload file {}: {source}", path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode one file part as a complete `multipart/form-data` body.
///
/// Deterministic: the same arguments always yield the same bytes.
pub fn encode(
    boundary: &str,
    parameter_name: &str,
    file_bytes: &[u8],
    file_name: &str,
    content_type: &str,
) -> Result<Vec<u8>, MultipartError> {
    if boundary.is_empty() {
        return Err(MultipartError::UnableToEncode("boundary is empty".to_string()));
    }
    check_header_value("boundary", boundary)?;
    check_header_value("parameter name", parameter_name)?;
    check_quoted_value("parameter name", parameter_name)?;
    check_header_value("file name", file_name)?;
    check_quoted_value("file name", file_name)?;
    check_header_value("content type", content_type)?;

    let head = format!(
        "{MARKER}{boundary}{CRLF}\
         Content-Disposition: form-data; name=\"{parameter_name}\"; filename=\"{file_name}\"{CRLF}\
         Content-Type: {content_type}{CRLF}{CRLF}"
    );
    let tail = format!("{CRLF}{MARKER}{boundary}{MARKER}{CRLF}");

    let mut body = Vec::with_capacity(head.len() + file_bytes.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(tail.as_bytes());
    Ok(body)
}

fn check_header_value(what: &str, value: &str) -> Result<(), MultipartError> {
    if value.contains(['\r', '\n']) {
        return Err(MultipartError::UnableToEncode(format!(
            "{what} contains a line break"
        )));
    }
    Ok(())
}

// Values written inside `name="..."` / `filename="..."` cannot carry a quote.
fn check_quoted_value(what: &str, value: &str) -> Result<(), MultipartError> {
    if value.contains('"') {
        return Err(MultipartError::UnableToEncode(format!(
            "{what} contains a double quote"
        )));
    }
    Ok(())
}

/// Read an upload source, mapping failures to `InvalidFile`.
pub(crate) fn read_file(file: &Path) -> Result<Vec<u8>, MultipartError> {
    std::fs::read(file).map_err(|source| MultipartError::InvalidFile {
        path: file.to_path_buf(),
        source,
    })
}

/// The last path component of `file`, which must be UTF-8.
pub(crate) fn file_name_of(file: &Path) -> Result<&str, MultipartError> {
    file.file_name()
        .ok_or_else(|| MultipartError::UnableToEncode(format!("{} has no file name", file.display())))?
        .to_str()
        .ok_or_else(|| {
            MultipartError::UnableToEncode(format!("file name of {} is not UTF-8", file.display()))
        })
}

/// Builder for single-file multipart uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    parameter_name: String,
}

impl MultipartForm {
    pub const DEFAULT_PARAMETER_NAME: &'static str = "image";

    /// A form with a freshly generated boundary.
    pub fn new(parameter_name: impl Into<String>) -> Self {
        Self {
            boundary: generate_boundary(),
            parameter_name: parameter_name.into(),
        }
    }

    pub fn with_boundary(boundary: impl Into<String>, parameter_name: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parameter_name: parameter_name.into(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// `multipart/form-data; boundary=...` for this form.
    pub fn content_type(&self) -> ContentType {
        ContentType::multipart_form_data(&self.boundary)
    }

    pub fn encode(
        &self,
        file_bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<Vec<u8>, MultipartError> {
        encode(
            &self.boundary,
            &self.parameter_name,
            file_bytes,
            file_name,
            content_type,
        )
    }

    /// Read `file` and encode it, using its last path component as file name.
    pub fn encode_file(&self, file: &Path, content_type: &str) -> Result<Vec<u8>, MultipartError> {
        let file_bytes = read_file(file)?;
        self.encode(&file_bytes, file_name_of(file)?, content_type)
    }

    /// Attach the encoded `file` to `request` along with the multipart headers.
    ///
    /// On error `request` is left untouched.
    pub fn configure(
        &self,
        request: &mut HttpRequest,
        file: &Path,
        content_type: &str,
    ) -> Result<(), MultipartError> {
        let file_bytes = read_file(file)?;
        self.configure_bytes(request, &file_bytes, file_name_of(file)?, content_type)
    }

    /// Same as `configure` for contents that are already in memory.
    pub fn configure_bytes(
        &self,
        request: &mut HttpRequest,
        file_bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<(), MultipartError> {
        let body = self.encode(file_bytes, file_name, content_type)?;

        request.set_header(CONTENT_TYPE_HEADER, self.content_type().as_str());
        request.set_header(CONTENT_LENGTH_HEADER, body.len().to_string());
        request.set_header("accept-encoding", "gzip, deflate");
        request.set_header("Accept", ContentType::ANY.as_str());
        request.body = Some(RequestBody::Bytes(body));
        request.handle_cookies = false;
        Ok(())
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PARAMETER_NAME)
    }
}

fn generate_boundary() -> String {
    format!("Boundary-{}", Uuid::new_v4().simple())
}
