//! Parameterized URL paths.
//!
//! A `PathTemplate` substitutes `{name}` placeholders with literal values.
//! Substitution is plain string replacement: values are not escaped and
//! templates do not nest.

use std::collections::BTreeMap;
use std::fmt;

/// Errors raised while resolving a `PathTemplate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The template string was empty.
    #[error("original path is empty")]
    InvalidOriginalPath,

    /// An argument had no matching `{key}` placeholder.
    #[error("no placeholder `{{{key}}}` in path")]
    InvalidPathArgument { key: String },
}

/// A request path that is expected to start with `/`.
///
/// A value without the leading slash is still accepted; construction emits a
/// `tracing` warning so callers can surface the mistake.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if !raw.starts_with('/') {
            tracing::warn!(endpoint = %raw, "endpoints must start with `/`");
        }
        Endpoint(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_formed(&self) -> bool {
        self.0.starts_with('/')
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A path with every `{key}` placeholder replaced by its argument.
///
/// Immutable once built. Construction fails as a whole: a template is never
/// returned half-substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    original_path: String,
    arguments: BTreeMap<String, String>,
    path: String,
}

impl PathTemplate {
    pub fn new<I, K, V>(original_path: impl Into<String>, arguments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let original_path = original_path.into();
        if original_path.is_empty() {
            return Err(PathError::InvalidOriginalPath);
        }
        // Pairs apply in iteration order; a repeated key finds its
        // placeholder already consumed and fails.
        let mut path = original_path.clone();
        let mut applied = BTreeMap::new();
        for (key, value) in arguments {
            let (key, value): (String, String) = (key.into(), value.into());
            let placeholder = format!("{{{key}}}");
            let replaced = path.replace(&placeholder, &value);
            if replaced == path {
                return Err(PathError::InvalidPathArgument { key });
            }
            path = replaced;
            applied.insert(key, value);
        }

        Ok(Self {
            original_path,
            arguments: applied,
            path,
        })
    }

    pub fn from_endpoint<I, K, V>(endpoint: &Endpoint, arguments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(endpoint.as_str(), arguments)
    }

    /// The resolved path, ready to be used in a request.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn arguments(&self) -> &BTreeMap<String, String> {
        &self.arguments
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const NO_ARGS: [(&str, &str); 0] = [];

    #[test]
    fn resolves_profile_picture_path() {
        let path = PathTemplate::new("/api/profile-picture/{image}", [("image", "name")]).unwrap();
        assert_eq!(path.path(), "/api/profile-picture/name");
        assert_eq!(path.original_path(), "/api/profile-picture/{image}");
        assert_eq!(path.arguments()["image"], "name");
    }

    #[test]
    fn empty_original_path_is_rejected() {
        let err = PathTemplate::new("", NO_ARGS).unwrap_err();
        assert_eq!(err, PathError::InvalidOriginalPath);
    }

    #[test]
    fn empty_original_path_is_rejected_before_arguments() {
        let err = PathTemplate::new("", [("x", "1")]).unwrap_err();
        assert_eq!(err, PathError::InvalidOriginalPath);
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let err = PathTemplate::new("/a/{x}", [("y", "1")]).unwrap_err();
        assert_eq!(err, PathError::InvalidPathArgument { key: "y".to_string() });
    }

    #[test]
    fn one_bad_key_fails_the_whole_template() {
        let err = PathTemplate::new("/a/{x}/b", [("x", "1"), ("zz", "2")]).unwrap_err();
        assert!(matches!(err, PathError::InvalidPathArgument { key } if key == "zz"));
    }

    #[test]
    fn repeated_key_is_rejected() {
        let err = PathTemplate::new("/a/{x}", [("x", "1"), ("x", "2")]).unwrap_err();
        assert_eq!(err, PathError::InvalidPathArgument { key: "x".to_string() });
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let path = PathTemplate::new("/{id}/copy/{id}", [("id", "7")]).unwrap();
        assert_eq!(path.path(), "/7/copy/7");
    }

    #[test]
    fn values_are_not_escaped() {
        let path = PathTemplate::new("/files/{name}", [("name", "a b/c")]).unwrap();
        assert_eq!(path.path(), "/files/a b/c");
    }

    #[test]
    fn template_without_arguments_is_kept_verbatim() {
        let path = PathTemplate::new("/static/{unused}", NO_ARGS).unwrap();
        assert_eq!(path.path(), "/static/{unused}");
    }

    #[test]
    fn self_substitution_counts_as_no_change() {
        let err = PathTemplate::new("/a/{x}", [("x", "{x}")]).unwrap_err();
        assert!(matches!(err, PathError::InvalidPathArgument { .. }));
    }

    #[test]
    fn endpoint_keeps_value_without_leading_slash() {
        let endpoint = Endpoint::new("api/users");
        assert_eq!(endpoint.as_str(), "api/users");
        assert!(!endpoint.is_well_formed());
        assert!(Endpoint::new("/api/users").is_well_formed());
    }

    #[test]
    fn template_from_endpoint() {
        let endpoint = Endpoint::new("/api/users/{id}");
        let path = PathTemplate::from_endpoint(&endpoint, [("id", "42")]).unwrap();
        assert_eq!(path.to_string(), "/api/users/42");
    }

    #[test]
    #[traced_test]
    fn endpoint_without_slash_emits_warning() {
        let _ = Endpoint::new("api/users");
        assert!(logs_contain("endpoints must start with"));
    }

    #[test]
    #[traced_test]
    fn well_formed_endpoint_is_silent() {
        let _ = Endpoint::new("/api/users");
        assert!(!logs_contain("endpoints must start with"));
    }
}
