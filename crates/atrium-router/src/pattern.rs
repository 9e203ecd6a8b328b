//! Compiled route patterns.

use std::borrow::Cow;
use std::fmt;

use crate::error::RouteError;
use crate::params::Params;

/// A segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// A literal segment (e.g., "users")
    Literal(String),

    /// A parameter segment (e.g., ":user-id" or "{userId}")
    Param(String),
}

/// A route pattern compiled into segments.
///
/// Parameters may be written `:name` or `{name}`. A parameter matches exactly
/// one non-empty path segment and binds its percent-decoded value. Leading and
/// trailing slashes are ignored on both the pattern and the path.
///
/// # Example
///
/// ```rust
/// use atrium_router::RoutePattern;
///
/// let pattern = RoutePattern::parse("/users/:user-id").unwrap();
/// let params = pattern.match_path("/users/2").unwrap();
/// assert_eq!(params.get("user-id"), Some("2"));
///
/// assert!(pattern.match_path("/users").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses and validates a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] for an empty parameter name or a
    /// parameter name used twice.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let mut segments = Vec::new();

        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            let segment = match param_name(raw) {
                Some("") => {
                    return Err(RouteError::invalid_pattern(pattern, "empty parameter name"));
                }
                Some(name) => {
                    let duplicate = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                    if duplicate {
                        return Err(RouteError::invalid_pattern(
                            pattern,
                            format!("duplicate parameter '{name}'"),
                        ));
                    }
                    Segment::Param(name.to_string())
                }
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Returns the pattern as written at registration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the names of the pattern's parameters, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Attempts to match this pattern against a path.
    ///
    /// Returns extracted parameters if the pattern matches.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();

        for (pattern, actual) in self.segments.iter().zip(path_segments) {
            match pattern {
                Segment::Literal(expected) => {
                    if decode(actual) != expected.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.push(name.clone(), decode(actual).into_owned());
                }
            }
        }

        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Returns the parameter name if the raw segment is a parameter.
fn param_name(raw: &str) -> Option<&str> {
    if let Some(name) = raw.strip_prefix(':') {
        return Some(name);
    }
    raw.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

/// Percent-decodes a path segment, keeping it raw when it is not valid UTF-8.
fn decode(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colon_and_brace_params() {
        let colon = RoutePattern::parse("/users/:user-id").unwrap();
        let brace = RoutePattern::parse("/users/{user-id}").unwrap();
        assert_eq!(colon.param_names().collect::<Vec<_>>(), vec!["user-id"]);
        assert_eq!(brace.param_names().collect::<Vec<_>>(), vec!["user-id"]);
        assert_eq!(colon.match_path("/users/5"), brace.match_path("/users/5"));
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        assert!(matches!(
            RoutePattern::parse("/users/:"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(RoutePattern::parse("/users/{}").is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let err = RoutePattern::parse("/a/:id/b/:id").unwrap_err();
        assert!(err.to_string().contains("duplicate parameter 'id'"));
    }

    #[test]
    fn test_match_literal() {
        let pattern = RoutePattern::parse("/users").unwrap();
        assert!(pattern.match_path("/users").unwrap().is_empty());
        assert!(pattern.match_path("/posts").is_none());
    }

    #[test]
    fn test_match_normalizes_slashes() {
        let pattern = RoutePattern::parse("/users").unwrap();
        assert!(pattern.match_path("users").is_some());
        assert!(pattern.match_path("/users/").is_some());
    }

    #[test]
    fn test_match_collapses_empty_segments() {
        let pattern = RoutePattern::parse("/users/:user-id").unwrap();
        for path in ["/users//2", "/users/2/", "//users/2"] {
            let params = pattern.match_path(path).unwrap();
            assert_eq!(params.get("user-id"), Some("2"), "{path}");
        }
        assert!(pattern.match_path("/users//").is_none());
    }

    #[test]
    fn test_match_root() {
        let pattern = RoutePattern::parse("/").unwrap();
        assert!(pattern.match_path("/").is_some());
        assert!(pattern.match_path("").is_some());
        assert!(pattern.match_path("/users").is_none());
    }

    #[test]
    fn test_match_segment_count_mismatch() {
        let pattern = RoutePattern::parse("/users/:user-id").unwrap();
        assert!(pattern.match_path("/users").is_none());
        assert!(pattern.match_path("/users/1/extra").is_none());
    }

    #[test]
    fn test_match_decodes_params() {
        let pattern = RoutePattern::parse("/users/:name").unwrap();
        let params = pattern.match_path("/users/ada%20lovelace").unwrap();
        assert_eq!(params.get("name"), Some("ada lovelace"));
    }

    #[test]
    fn test_match_multiple_params() {
        let pattern = RoutePattern::parse("/orgs/:org/users/:user").unwrap();
        let params = pattern.match_path("/orgs/acme/users/7").unwrap();
        assert_eq!(params.get("org"), Some("acme"));
        assert_eq!(params.get("user"), Some("7"));
    }

    #[test]
    fn test_display_is_source() {
        let pattern = RoutePattern::parse("/users/:user-id").unwrap();
        assert_eq!(pattern.to_string(), "/users/:user-id");
    }
}
