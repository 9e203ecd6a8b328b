//! Response construction.

use atrium_core::AtriumError;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;

/// Response body type.
pub type ResponseBody = Full<Bytes>;

/// HTTP response type produced by the pipeline.
pub type HttpResponse = Response<ResponseBody>;

/// Header carrying the request identifier.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const JSON: &str = "application/json";
const HTML: &str = "text/html; charset=utf-8";

/// Builds a response with a content type.
pub fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Builds a JSON response from an already serialized body.
pub fn json(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, JSON, body)
}

/// Builds an HTML response.
pub fn html(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, HTML, body)
}

/// Builds the JSON error envelope response for an error.
pub fn error(err: &AtriumError, request_id: Option<&str>) -> HttpResponse {
    let envelope = err.to_envelope(request_id);
    let body = serde_json::to_vec(&envelope).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize error envelope");
        br#"{"error":{"code":"INTERNAL_ERROR","message":"internal server error","category":"internal"}}"#
            .to_vec()
    });
    json(err.status_code(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let err = AtriumError::not_found_resource("record", "999");
        let response = error(&err, Some("req-1"));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["details"]["resource_id"], "999");
        assert_eq!(body["request_id"], "req-1");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = AtriumError::internal("database exploded");
        let body = body_json(error(&err, None)).await;

        assert_eq!(body["error"]["message"], "internal server error");
        assert!(body.get("request_id").is_none());
    }

    #[test]
    fn test_html_content_type() {
        let response = html(StatusCode::OK, "<p>hi</p>");
        assert_eq!(response.headers()[CONTENT_TYPE], HTML);
    }
}
