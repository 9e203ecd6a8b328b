//! Per-request credential extraction.
//!
//! Credentials are read once per request from the `Authorization` header,
//! independently of the request path. Anything other than a well-formed
//! `Basic` header counts as "no credentials".

use atrium_core::Credentials;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Extracts Basic credentials from request headers.
///
/// Returns `None` when the header is absent or malformed: non-`Basic`
/// scheme, invalid base64, non-UTF-8 payload, or a payload without a colon.
///
/// # Example
///
/// ```
/// use atrium_authz::{basic_authorization, extract_credentials};
/// use http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// let value = basic_authorization("dave", "secret");
/// headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
///
/// let credentials = extract_credentials(&headers).unwrap();
/// assert_eq!(credentials.username(), "dave");
/// ```
pub fn extract_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    parse_basic(value)
}

/// Parses the value of an `Authorization: Basic ...` header.
pub fn parse_basic(value: &str) -> Option<Credentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials::new(username, password))
}

/// Builds an `Authorization` header value for Basic credentials.
pub fn basic_authorization(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_valid() {
        let headers = headers_with(&basic_authorization("dave", "pw"));
        let credentials = extract_credentials(&headers).unwrap();
        assert_eq!(credentials.username(), "dave");
        assert_eq!(credentials.password(), "pw");
    }

    #[test]
    fn test_extract_absent() {
        assert!(extract_credentials(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("dave:pw");
        let credentials = parse_basic(&format!("basic {encoded}")).unwrap();
        assert_eq!(credentials.username(), "dave");
    }

    #[test]
    fn test_password_may_contain_colon() {
        let credentials = parse_basic(&basic_authorization("dave", "a:b")).unwrap();
        assert_eq!(credentials.password(), "a:b");
    }

    #[test]
    fn test_empty_username_is_still_parsed() {
        let credentials = parse_basic(&basic_authorization("", "")).unwrap();
        assert!(!credentials.is_present());
    }

    #[test]
    fn test_malformed_headers_are_absent() {
        assert!(parse_basic("Bearer abc").is_none());
        assert!(parse_basic("Basic !!!not-base64").is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode("no-colon"))).is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':']))).is_none());
        assert!(parse_basic("Basic").is_none());
        assert!(parse_basic("").is_none());
    }

    #[test]
    fn test_non_ascii_header_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Basic \xe9").unwrap());
        assert!(extract_credentials(&headers).is_none());
    }
}
