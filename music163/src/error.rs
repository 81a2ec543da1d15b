//! Error types for the music.163.com API client.
//!
//! Also hosts the response classifier ([`check_response`]), which turns any
//! HTTP status outside `200..=299` into an [`ErrorResponse`].

use crate::response::ResponseInfo;
use reqwest::blocking::Response;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the music.163.com API.
#[derive(Debug, Error)]
pub enum Music163Error {
    /// A path, URL reference, or base endpoint could not be parsed.
    #[error("invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    /// A query-options value could not be turned into key/value pairs.
    #[error("cannot encode query options: {0}")]
    Encoding(String),

    /// The request body could not be serialized to JSON.
    #[error("cannot serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The configured user agent is not a valid header value.
    #[error("invalid user agent: {0}")]
    UserAgent(#[from] reqwest::header::InvalidHeaderValue),

    /// HTTP transport error (DNS, connection refused, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body stream broke while being copied or drained.
    #[error("response stream interrupted ({}): {source}", .response.status)]
    Stream {
        response: Box<ResponseInfo>,
        #[source]
        source: std::io::Error,
    },

    /// The response body is not valid JSON or does not fit the result shape.
    #[error("cannot decode response ({}): {source}", .response.status)]
    Decoding {
        response: Box<ResponseInfo>,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a non-2xx HTTP status.
    #[error(transparent)]
    Api(Box<ErrorResponse>),

    /// The server answered 2xx but put a non-200 `code` in the JSON body.
    ///
    /// Seen for unknown ids (`404`), throttling (`-460`) and parameter
    /// errors (`400`).
    #[error("API error (code {code}): {message}")]
    Code {
        /// Body-level status code (not the HTTP status).
        code: i64,
        /// Message from the body, or `"unknown error"`.
        message: String,
    },

    /// The API returned an empty list for the requested id.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: u64 },
}

impl Music163Error {
    /// Whether this error belongs to the transport class (network failure or
    /// a broken body stream).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Stream { .. })
    }

    /// The response envelope, for errors raised after a response arrived.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            Self::Stream { response, .. } | Self::Decoding { response, .. } => Some(&**response),
            Self::Api(err) => Some(&err.response),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            _ => self.response().map(|r| r.status),
        }
    }

    pub(crate) fn stream(response: &ResponseInfo, source: std::io::Error) -> Self {
        Self::Stream {
            response: Box::new(response.clone()),
            source,
        }
    }

    pub(crate) fn decoding(response: &ResponseInfo, source: serde_json::Error) -> Self {
        Self::Decoding {
            response: Box::new(response.clone()),
            source,
        }
    }
}

impl From<ErrorResponse> for Music163Error {
    fn from(err: ErrorResponse) -> Self {
        Self::Api(Box::new(err))
    }
}

/// Convenience alias for `Result<T, Music163Error>`.
pub type Result<T> = std::result::Result<T, Music163Error>;

/// A non-2xx API response.
///
/// Body shape:
///
/// ```json
/// {
///   "message": "not found",
///   "errors": [ { "resource": "song", "field": "id", "code": "missing" } ]
/// }
/// ```
///
/// Both fields are optional; a body that is empty or not JSON leaves them
/// empty instead of replacing the HTTP failure with a parse error.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub method: Method,
    /// Request URL.
    pub url: Url,
    /// Status line and headers of the failed response.
    pub response: ResponseInfo,
    /// Top-level message from the body.
    pub message: String,
    /// Field-level errors, in server order.
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    /// Build an envelope from a raw failure body.
    ///
    /// Each field is picked independently, so a malformed `errors` entry does
    /// not lose the `message` or the well-formed entries.
    pub fn from_body(method: Method, url: Url, response: ResponseInfo, body: &[u8]) -> Self {
        let json: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let message = json["message"].as_str().unwrap_or_default().to_owned();
        let errors = json["errors"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| FieldError::deserialize(v).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            url,
            response,
            message,
            errors,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {} [",
            self.method,
            self.url,
            self.response.status.as_u16(),
            self.message
        )?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for ErrorResponse {}

/// One field-level error inside an [`ErrorResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldError {
    pub resource: String,
    pub field: String,
    pub code: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error caused by {} field on {} resource",
            self.code, self.field, self.resource
        )
    }
}

/// Whether `status` counts as success: `200..=299`, redirects excluded.
pub fn is_success(status: StatusCode) -> bool {
    (200..=299).contains(&status.as_u16())
}

/// Check an API response for errors.
///
/// `info` is the envelope already taken from `response`. On success the body
/// is left unread. On failure the whole body is read and parsed into an
/// [`ErrorResponse`]; a read failure yields an empty envelope rather than an
/// I/O error.
pub fn check_response(
    method: &Method,
    url: &Url,
    info: &ResponseInfo,
    response: &mut Response,
) -> std::result::Result<(), ErrorResponse> {
    if is_success(info.status) {
        return Ok(());
    }
    let mut body = Vec::new();
    if response.read_to_end(&mut body).is_err() {
        body.clear();
    }
    Err(ErrorResponse::from_body(
        method.clone(),
        url.clone(),
        info.clone(),
        &body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

    fn url() -> Url {
        Url::parse("http://music.163.com/api/song/detail?id=1").unwrap()
    }

    fn info(status: StatusCode) -> ResponseInfo {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        ResponseInfo {
            status,
            headers,
            url: url(),
        }
    }

    #[test]
    fn test_success_range_is_inclusive() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::NO_CONTENT));
        assert!(is_success(StatusCode::from_u16(299).unwrap()));
        assert!(!is_success(StatusCode::from_u16(199).unwrap()));
        assert!(!is_success(StatusCode::MULTIPLE_CHOICES));
        assert!(!is_success(StatusCode::FOUND));
        assert!(!is_success(StatusCode::NOT_FOUND));
        assert!(!is_success(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_error_response_rendering() {
        let body = br#"{"message":"not found","errors":[{"resource":"song","field":"id","code":"missing"}]}"#;
        let err = ErrorResponse::from_body(Method::GET, url(), info(StatusCode::NOT_FOUND), body);
        assert_eq!(err.message, "not found");
        assert_eq!(err.errors.len(), 1);

        let msg = err.to_string();
        assert!(msg.starts_with("GET http://music.163.com/api/song/detail?id=1: 404 "));
        assert!(msg.contains("not found"));
        assert!(msg.contains("missing error caused by id field on song resource"));
    }

    #[test]
    fn test_error_response_keeps_server_order() {
        let body = br#"{"message":"bad","errors":[
            {"resource":"b","field":"f","code":"dup"},
            {"resource":"a","field":"f","code":"dup"},
            {"resource":"b","field":"f","code":"dup"}]}"#;
        let err = ErrorResponse::from_body(Method::POST, url(), info(StatusCode::BAD_REQUEST), body);
        let resources: Vec<&str> = err.errors.iter().map(|e| e.resource.as_str()).collect();
        assert_eq!(resources, ["b", "a", "b"]);
        assert!(err.to_string().ends_with(
            "[dup error caused by f field on b resource; \
             dup error caused by f field on a resource; \
             dup error caused by f field on b resource]"
        ));
    }

    #[test]
    fn test_error_response_tolerates_garbage() {
        let err = ErrorResponse::from_body(
            Method::GET,
            url(),
            info(StatusCode::BAD_GATEWAY),
            b"<html>bad gateway</html>",
        );
        assert!(err.message.is_empty());
        assert!(err.errors.is_empty());
        assert!(err.to_string().contains(": 502  []"));

        let empty = ErrorResponse::from_body(Method::GET, url(), info(StatusCode::FORBIDDEN), b"");
        assert!(empty.message.is_empty());
    }

    #[test]
    fn test_error_response_partial_envelope() {
        let body = br#"{"message":"half","errors":[{"resource":"album","code":"invalid"}, 42]}"#;
        let err = ErrorResponse::from_body(Method::GET, url(), info(StatusCode::UNPROCESSABLE_ENTITY), body);
        assert_eq!(err.message, "half");
        assert_eq!(
            err.errors,
            vec![FieldError {
                resource: "album".into(),
                field: String::new(),
                code: "invalid".into(),
            }]
        );
    }

    #[test]
    fn test_api_error_is_transparent() {
        let inner = ErrorResponse::from_body(Method::GET, url(), info(StatusCode::NOT_FOUND), b"");
        let rendered = inner.to_string();
        let err: Music163Error = inner.into();
        assert_eq!(err.to_string(), rendered);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.response().unwrap().headers[CONTENT_TYPE], "application/json");
        assert!(!err.is_transport());
    }
}
