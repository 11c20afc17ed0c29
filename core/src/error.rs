//! Error types for the todo API client.
//!
//! # Design
//! Every failure is classified at the operation boundary. `Display` yields
//! the single human-readable line that ends up in the list state's error
//! slot, while the variants stay available for callers that want to branch
//! (for example on `403` or `404`).

use thiserror::Error;

/// Errors returned by `TodoClient`, transports, and the synchronizer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received from the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status. `detail` carries the first
    /// message from the backend's `errors` array when it sent one.
    #[error("{status} - {reason}")]
    Http {
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    /// A client-side precondition failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The response body could not be deserialized into the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// The operation was cancelled before its response was applied.
    #[error("operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Unknown(String),
}

/// Coarse error classes shown to users and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Validation,
    Unknown,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Decode(_)
            | ApiError::Encode(_)
            | ApiError::Cancelled
            | ApiError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Build an HTTP error, filling the reason from the status code.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        let reason = ::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        ApiError::Http {
            status,
            reason,
            detail,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_uses_canonical_reason() {
        let err = ApiError::http(404, None);
        assert_eq!(err.to_string(), "404 - Not Found");
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[test]
    fn unregistered_status_gets_placeholder_reason() {
        let err = ApiError::http(599, None);
        assert_eq!(err.to_string(), "599 - Unknown Status");
    }

    #[test]
    fn forbidden_is_an_ordinary_http_error() {
        let err = ApiError::http(403, Some("You are not allowed to perform this action.".into()));
        assert!(err.is_forbidden());
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[test]
    fn decode_and_cancel_classify_as_unknown() {
        assert_eq!(ApiError::Decode("eof".into()).kind(), ErrorKind::Unknown);
        assert_eq!(ApiError::Cancelled.kind(), ErrorKind::Unknown);
    }
}
