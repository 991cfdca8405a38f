//! Upstream error type.
//!
//! Every failure of a Storage Box listing is an [`ApiError`]. Only the
//! [`ApiError::Status`] variant carries an HTTP status code; the remaining
//! variants describe failures where no status was received at all.

use std::time::Duration;

use thiserror::Error;

/// Failure of a Hetzner API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("Hetzner API error (status={status}{}): {message}", fmt_request_id(.request_id))]
    Status {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Connection, TLS, DNS or body transfer failure.
    #[error("failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response whose body is not a valid listing.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No response within the fetch deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

fn fmt_request_id(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(", request_id={id}"),
        None => String::new(),
    }
}

impl ApiError {
    /// Build a status error with the canonical message for well-known codes.
    pub fn from_status(status: u16, request_id: Option<String>) -> Self {
        let message = match status {
            401 => "Unauthorized: Invalid or missing API token".to_string(),
            403 => "Forbidden: Insufficient permissions for this operation".to_string(),
            429 => "Rate limited: Too many requests, please try again later".to_string(),
            404 => "Not found: The requested resource was not found".to_string(),
            400 => "Bad request: The request was invalid or cannot be served".to_string(),
            s if s >= 500 => format!("Server error: Hetzner API returned status {s}"),
            s => format!("HTTP error: Hetzner API returned status {s}"),
        };
        Self::Status {
            status,
            message,
            request_id,
        }
    }

    /// HTTP status code, if the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Request id reported by the API, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Status { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// 401 or 403.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    /// Any 4xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(400..=499))
    }

    /// Any 5xx.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(500..=599))
    }

    /// Rate limiting or a server-side failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self.status_code(), Some(429 | 500..=599))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_request_id() {
        let err = ApiError::Status {
            status: 401,
            message: "Invalid token".to_string(),
            request_id: Some("req-123".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Hetzner API error (status=401, request_id=req-123): Invalid token"
        );
    }

    #[test]
    fn test_display_without_request_id() {
        let err = ApiError::from_status(503, None);
        assert_eq!(
            err.to_string(),
            "Hetzner API error (status=503): Server error: Hetzner API returned status 503"
        );
    }

    #[test]
    fn test_from_status_messages() {
        let err = ApiError::from_status(429, Some("abc".to_string()));
        assert!(err.to_string().contains("Rate limited"));
        assert_eq!(err.request_id(), Some("abc"));

        let err = ApiError::from_status(418, None);
        assert!(err.to_string().contains("HTTP error"));
    }

    #[test]
    fn test_predicates() {
        let unauthorized = ApiError::from_status(401, None);
        assert!(unauthorized.is_auth_error());
        assert!(unauthorized.is_client_error());
        assert!(!unauthorized.is_retryable());

        let forbidden = ApiError::from_status(403, None);
        assert!(forbidden.is_auth_error());

        let limited = ApiError::from_status(429, None);
        assert!(limited.is_client_error());
        assert!(limited.is_retryable());

        let server = ApiError::from_status(502, None);
        assert!(server.is_server_error());
        assert!(server.is_retryable());
        assert!(!server.is_client_error());
    }

    #[test]
    fn test_statusless_variants() {
        let timeout = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(timeout.status_code(), None);
        assert_eq!(timeout.request_id(), None);
        assert!(!timeout.is_retryable());

        let decode = ApiError::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert_eq!(decode.status_code(), None);
        assert!(decode.to_string().starts_with("failed to decode response"));
    }
}
