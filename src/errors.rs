use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Which field of an error payload carries the user-facing message.
///
/// The chat endpoint reports failures in `response`; the to-do and tracker
/// endpoints use `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    Error,
    Response,
}

impl ErrorField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Response => "response",
        }
    }
}

#[derive(Debug)]
pub enum SyncError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-2xx status.
    Server { status: StatusCode, body: Option<Value> },
    /// A 2xx response whose body did not match the contract.
    Decode(String),
}

impl SyncError {
    pub fn network(err: impl std::error::Error) -> Self {
        Self::Network(err.to_string())
    }

    pub fn server(status: StatusCode, body: Option<Value>) -> Self {
        Self::Server { status, body }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Reads `field` from the error payload, if the server sent one.
    pub fn server_message(&self, field: ErrorField) -> Option<&str> {
        match self {
            Self::Server { body: Some(body), .. } => body.get(field.key()).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Message shown to the user: the payload field when present, otherwise
    /// this error's own description.
    pub fn user_message(&self, field: ErrorField) -> String {
        self.server_message(field)
            .map(str::to_owned)
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network failure: {message}"),
            Self::Server { status, .. } => write!(f, "server returned {status}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::network(err)
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_reads_the_requested_field() {
        let err = SyncError::server(
            StatusCode::BAD_REQUEST,
            Some(json!({ "error": "Task is required", "response": "ignored" })),
        );
        assert_eq!(err.server_message(ErrorField::Error), Some("Task is required"));
        assert_eq!(err.server_message(ErrorField::Response), Some("ignored"));
    }

    #[test]
    fn missing_field_falls_back_to_description() {
        let err = SyncError::server(StatusCode::INTERNAL_SERVER_ERROR, Some(json!({ "detail": "x" })));
        assert_eq!(err.server_message(ErrorField::Error), None);
        assert_eq!(err.user_message(ErrorField::Error), "server returned 500 Internal Server Error");
    }

    #[test]
    fn network_failures_carry_no_payload() {
        let err = SyncError::Network("connection refused".into());
        assert!(err.is_network());
        assert_eq!(err.status(), None);
        assert_eq!(
            err.user_message(ErrorField::Response),
            "network failure: connection refused"
        );
    }
}
