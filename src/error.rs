use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the Fakturoid client.
///
/// Every variant produced from an HTTP response carries the status code and
/// the response body exactly as the server sent it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Credentials were rejected or the access token could not be refreshed.
    #[error("authentication failed (HTTP {status}): {body}")]
    Auth { status: StatusCode, body: String },

    /// The requested resource does not exist.
    #[error("not found (HTTP {status}): {body}")]
    NotFound { status: StatusCode, body: String },

    /// The server refused the request with a structured `errors` body.
    #[error("validation failed (HTTP {status}): {body}")]
    Validation {
        status: StatusCode,
        /// The `errors` member of the response, usually `{field: [messages]}`.
        errors: serde_json::Value,
        body: String,
    },

    /// Any other unsuccessful HTTP status.
    #[error("unexpected HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Connection, TLS or protocol failure below HTTP.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected model.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A paginated list was indexed past its end.
    #[error("index {index} out of range{}", len_suffix(.len))]
    IndexOutOfRange { index: isize, len: Option<usize> },

    /// The caller passed something the client can reject without asking the server.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify an unsuccessful response.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth { status, body },
            StatusCode::NOT_FOUND => Self::NotFound { status, body },
            s if s.is_client_error() => match extract_errors(&body) {
                Some(errors) => Self::Validation {
                    status,
                    errors,
                    body,
                },
                None => Self::Http { status, body },
            },
            _ => Self::Http { status, body },
        }
    }

    /// HTTP status of the failed response, if the error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth { status, .. }
            | Self::NotFound { status, .. }
            | Self::Validation { status, .. }
            | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Raw response body, if the error came from a response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Auth { body, .. }
            | Self::NotFound { body, .. }
            | Self::Validation { body, .. }
            | Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn len_suffix(len: &Option<usize>) -> String {
    len.map(|l| format!(" for list of {l} items"))
        .unwrap_or_default()
}

fn extract_errors(body: &str) -> Option<serde_json::Value> {
    let mut value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get_mut("errors").map(serde_json::Value::take)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_body() {
        let err = Error::from_response(StatusCode::NOT_FOUND, "{\"error\":\"nope\"}".into());
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some("{\"error\":\"nope\"}"));
    }

    #[test]
    fn unprocessable_with_errors_is_validation() {
        let body = r#"{"errors":{"number":["has already been taken"]}}"#;
        let err = Error::from_response(StatusCode::UNPROCESSABLE_ENTITY, body.into());
        match err {
            Error::Validation {
                status,
                errors,
                body: raw,
            } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(errors["number"][0], "has already been taken");
                assert_eq!(raw, body);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn client_error_without_errors_member_is_http() {
        let err = Error::from_response(StatusCode::BAD_REQUEST, "oops".into());
        assert!(matches!(err, Error::Http { .. }));
    }

    #[test]
    fn server_error_is_http_even_with_errors_member() {
        let err = Error::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"errors":{"base":["boom"]}}"#.into(),
        );
        assert!(matches!(err, Error::Http { .. }));
    }

    #[test]
    fn unauthorized_and_forbidden_are_auth() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = Error::from_response(status, String::new());
            assert!(matches!(err, Error::Auth { .. }));
        }
    }

    #[test]
    fn index_error_display() {
        let err = Error::IndexOutOfRange {
            index: 45,
            len: Some(30),
        };
        assert_eq!(err.to_string(), "index 45 out of range for list of 30 items");
        let err = Error::IndexOutOfRange {
            index: 3,
            len: None,
        };
        assert_eq!(err.to_string(), "index 3 out of range");
    }
}
