//! Declarative description of a remote operation.
//!
//! An [`Endpoint`] pairs an HTTP verb and a relative path template such as
//! `users/{user}/repos` with the function that decodes the response body.
//! Placeholders are filled from [`PathParams`] and each substituted value is
//! escaped as a single path segment. The dot segments `.` and `..` are
//! rejected since they would change the request path.

use crate::error::{RepoClientError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

/// Decodes a raw 2xx body. `Ok(None)` means the server sent no body.
pub type DecodeFn<T> = fn(&[u8]) -> serde_json::Result<Option<T>>;

pub struct Endpoint<T> {
    pub method: Method,
    /// Relative to the base URL, no leading slash.
    pub path: &'static str,
    pub decode: DecodeFn<T>,
}

impl<T> Endpoint<T> {
    /// Builds the absolute URL for this endpoint.
    pub fn resolve(&self, base: &Url, params: &PathParams) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RepoClientError::InvalidBaseUrl(format!("not a hierarchical URL: {}", base))
            })?;
            segments.pop_if_empty();

            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = params
                            .get(name)
                            .ok_or_else(|| RepoClientError::MissingPathParam(name.to_string()))?;
                        if value == "." || value == ".." {
                            return Err(RepoClientError::InvalidPathParam {
                                name: name.to_string(),
                                value: value.to_string(),
                            });
                        }
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

impl<T> std::fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

/// Values bound to `{name}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct PathParams {
    values: Vec<(&'static str, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// JSON body decoder. A zero-length body or a literal `null` is an absent body.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<Option<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: Endpoint<Vec<u32>> = Endpoint {
        method: Method::GET,
        path: "users/{user}/repos",
        decode: decode_json::<Vec<u32>>,
    };

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn substitutes_path_parameter() {
        let url = LIST
            .resolve(&base("https://api.github.com/"), &PathParams::new().with("user", "square"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/square/repos");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let url = LIST
            .resolve(&base("http://localhost:8080/api/v3/"), &PathParams::new().with("user", "octocat"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v3/users/octocat/repos");
    }

    #[test]
    fn escapes_value_as_single_segment() {
        let url = LIST
            .resolve(&base("https://api.github.com/"), &PathParams::new().with("user", "a b/c"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%20b%2Fc/repos");
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let err = LIST
            .resolve(&base("https://api.github.com/"), &PathParams::new())
            .unwrap_err();
        assert!(matches!(err, RepoClientError::MissingPathParam(name) if name == "user"));
    }

    #[test]
    fn dot_segments_are_rejected() {
        for value in [".", ".."] {
            let err = LIST
                .resolve(&base("https://api.github.com/"), &PathParams::new().with("user", value))
                .unwrap_err();
            assert!(
                matches!(&err, RepoClientError::InvalidPathParam { name, value: v } if name == "user" && v == value),
                "{:?}",
                err
            );
        }

        let url = LIST
            .resolve(&base("https://api.github.com/"), &PathParams::new().with("user", "..."))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/.../repos");
    }

    #[test]
    fn decode_treats_blank_and_null_as_absent() {
        assert_eq!(decode_json::<Vec<u32>>(b"").unwrap(), None);
        assert_eq!(decode_json::<Vec<u32>>(b"  \n").unwrap(), None);
        assert_eq!(decode_json::<Vec<u32>>(b"null").unwrap(), None);
        assert_eq!(decode_json::<Vec<u32>>(b"[]").unwrap(), Some(vec![]));
        assert_eq!(decode_json::<Vec<u32>>(b"[3,1,2]").unwrap(), Some(vec![3, 1, 2]));
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        assert!(decode_json::<Vec<u32>>(b"{\"message\":\"x\"}").is_err());
    }
}
